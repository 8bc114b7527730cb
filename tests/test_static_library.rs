use mandi_negotiators::builtin::haggler;
use mandi_negotiators::component::{
    factory, register_counterpart, CounterpartComponent, CounterpartFactory, NegotiationResult,
    OfferContext,
};
use mandi_negotiators::factory::*;
use mandi_negotiators::{NegotiationRoom, Price, ReplyDelay, Role, SessionStatus};
use mandi_negotiators_testing::{Framework, NegotiationStage, UserStrategy};

/// Names one price and sticks to it.
struct FixedPrice {
    price: Price,
}

impl CounterpartFactory for FixedPrice {
    fn new(_name: &str, config: serde_yaml::Value) -> anyhow::Result<FixedPrice> {
        Ok(FixedPrice {
            price: serde_yaml::from_value(config)?,
        })
    }
}

impl CounterpartComponent for FixedPrice {
    fn respond(&mut self, offer: &OfferContext) -> anyhow::Result<NegotiationResult> {
        if offer.offer == self.price {
            Ok(NegotiationResult::Accept { price: offer.offer })
        } else {
            Ok(NegotiationResult::Counter { price: self.price })
        }
    }
}

fn static_config(name: &str, params: serde_yaml::Value) -> NegotiationConfig {
    NegotiationConfig {
        seed: Some(3),
        reply_delay: ReplyDelay::none(),
        counterpart: CounterpartConfig {
            name: name.to_string(),
            load_mode: LoadMode::StaticLib {
                library: "mandi-negotiators".to_string(),
            },
            params,
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_static_library() {
    // Register negotiators as static library instead of using them as builtin.
    mandi_negotiators::builtin::register_negotiators();

    let params = serde_yaml::to_value(haggler::Config {
        concession: 0.5,
        ..Default::default()
    })
    .unwrap();
    let room = NegotiationRoom::new(static_config("Haggler", params)).unwrap();

    room.start_session(Role::Seller, "mango").await.unwrap();
    let mut rounds = 0;
    while room.snapshot().await.status() == SessionStatus::Active {
        room.quick_split().await.unwrap();
        rounds += 1;
        assert!(rounds <= 15, "Negotiation didn't finish");
    }

    let done = room.snapshot().await;
    assert_eq!(done.deal_price(), Some(done.user_price()));
}

#[test]
fn test_custom_static_counterpart() {
    register_counterpart("mandi-negotiators", "FixedPrice", factory::<FixedPrice>());

    let params = serde_yaml::to_value(95).unwrap();
    let framework = Framework::new(static_config("FixedPrice", params));
    let record = framework
        .run_at_market(Role::Buyer, "rice", 100, &UserStrategy::AcceptCounter)
        .unwrap();

    assert_eq!(
        record.stages,
        vec![
            NegotiationStage::Offer(85),
            NegotiationStage::Counter(95),
            NegotiationStage::Offer(95),
            NegotiationStage::Accept(95),
        ]
    );
}

#[test]
fn test_unregistered_counterpart() {
    let config = static_config("Nobody", serde_yaml::Value::Null);
    assert!(create_counterpart(config.counterpart).is_err());
}
