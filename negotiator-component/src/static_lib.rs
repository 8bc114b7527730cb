use anyhow::anyhow;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::component::CounterpartComponent;

pub type BoxedCounterpart = Box<dyn CounterpartComponent + Send>;

pub type ConstructorFunction =
    Box<dyn Fn(&str, serde_yaml::Value) -> anyhow::Result<BoxedCounterpart> + Send + Sync>;

/// Counterparts that can be built from name and yaml parameters.
pub trait CounterpartFactory: Sized {
    fn new(name: &str, config: serde_yaml::Value) -> anyhow::Result<Self>;
}

lazy_static! {
    /// Contains functions that can create counterparts by name.
    static ref CONSTRUCTORS: Arc<Mutex<HashMap<String, ConstructorFunction>>> = Arc::new(Mutex::new(HashMap::new()));
}

pub fn factory<T>() -> ConstructorFunction
where
    T: CounterpartFactory + CounterpartComponent + Send + 'static,
{
    Box::new(|name: &str, config: serde_yaml::Value| {
        Ok(Box::new(T::new(name, config)?) as BoxedCounterpart)
    })
}

pub fn register_counterpart(library: &str, name: &str, constructor: ConstructorFunction) {
    match (*CONSTRUCTORS).lock() {
        Ok(mut map) => {
            log::debug!("Registering counterpart '{}::{}'.", library, name);
            map.insert(format!("{}::{}", library, name), constructor);
        }
        Err(e) => log::error!(
            "Failed to register counterpart '{}::{}'. {}",
            library,
            name,
            e
        ),
    }
}

pub fn create_static_counterpart(
    name_path: &str,
    config: serde_yaml::Value,
) -> anyhow::Result<BoxedCounterpart> {
    let map = (*CONSTRUCTORS)
        .lock()
        .map_err(|e| anyhow!("Failed to acquire static Counterpart creation lock: {}", e))?;

    match map.get(name_path) {
        Some(constructor) => constructor(name_path, config),
        None => Err(anyhow!("Counterpart '{}' not found.", name_path)),
    }
}
