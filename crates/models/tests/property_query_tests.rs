//! Property-based tests for alarm query rendering.
//!
//! Randomly generated queries must always render the entity path, the page
//! limit, and at most one status parameter, with the coarse search status
//! taking precedence over the exact status.

use proptest::prelude::*;

use gateway_models::{
    AlarmQuery, AlarmSearchStatus, AlarmStatus, EntityId, EntityType, TimePageLink,
};

fn entity_type_strategy() -> impl Strategy<Value = EntityType> {
    prop_oneof![
        Just(EntityType::Tenant),
        Just(EntityType::Customer),
        Just(EntityType::Device),
        Just(EntityType::Asset),
    ]
}

fn search_status_strategy() -> impl Strategy<Value = AlarmSearchStatus> {
    prop_oneof![
        Just(AlarmSearchStatus::Any),
        Just(AlarmSearchStatus::Active),
        Just(AlarmSearchStatus::Cleared),
        Just(AlarmSearchStatus::Ack),
        Just(AlarmSearchStatus::Unack),
    ]
}

fn status_strategy() -> impl Strategy<Value = AlarmStatus> {
    prop_oneof![
        Just(AlarmStatus::ActiveUnack),
        Just(AlarmStatus::ActiveAck),
        Just(AlarmStatus::ClearedUnack),
        Just(AlarmStatus::ClearedAck),
    ]
}

proptest! {
    #[test]
    fn prop_query_shape(
        entity_type in entity_type_strategy(),
        id in "[a-f0-9]{8}",
        limit in 1usize..1000,
        start_time in proptest::option::of(0i64..2_000_000_000_000),
        search_status in proptest::option::of(search_status_strategy()),
        status in proptest::option::of(status_strategy()),
        fetch_originator in proptest::option::of(any::<bool>()),
    ) {
        let mut page_link = TimePageLink::new(limit);
        if let Some(start_time) = start_time {
            page_link = page_link.start_time(start_time);
        }
        let mut query = AlarmQuery::new(EntityId::new(entity_type, id.clone()), page_link);
        query.search_status = search_status;
        query.status = status;
        query.fetch_originator = fetch_originator;

        let rendered = query.to_query();

        let expected_prefix = format!("/{entity_type}/{id}?limit={limit}");
        prop_assert!(rendered.starts_with(&expected_prefix));

        // At most one status parameter, and searchStatus wins.
        let has_search = rendered.contains("&searchStatus=");
        let has_exact = rendered.contains("&status=");
        prop_assert!(!(has_search && has_exact));
        prop_assert_eq!(has_search, search_status.is_some());
        prop_assert_eq!(has_exact, search_status.is_none() && status.is_some());

        prop_assert_eq!(
            rendered.contains("&fetchOriginator="),
            fetch_originator.is_some()
        );
    }
}
