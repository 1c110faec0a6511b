
#[cfg(test)]
mod tests {
    use crate::event::{EventType, ListenerPriority};
    use crate::tests::integration::common::{Greet, Tick};

    #[test]
    fn test_listener_priority_default() {
        assert_eq!(ListenerPriority::default(), ListenerPriority::Normal);
    }

    #[test]
    fn test_listener_priority_values() {
        assert_eq!(ListenerPriority::Lowest.ordinal(), 0);
        assert_eq!(ListenerPriority::Low.ordinal(), 1);
        assert_eq!(ListenerPriority::Normal.ordinal(), 2);
        assert_eq!(ListenerPriority::High.ordinal(), 3);
        assert_eq!(ListenerPriority::Highest.ordinal(), 4);
        assert!(ListenerPriority::Highest > ListenerPriority::High);
        assert!(ListenerPriority::Low > ListenerPriority::Lowest);
    }

    #[test]
    fn test_listener_priority_serde_names() {
        let json = serde_json::to_string(&ListenerPriority::Highest).unwrap();
        assert_eq!(json, "\"highest\"");
        let parsed: ListenerPriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, ListenerPriority::Low);
    }

    #[test]
    fn test_event_type_identity_and_name() {
        assert_eq!(EventType::of::<Greet>(), EventType::of::<Greet>());
        assert_ne!(EventType::of::<Greet>(), EventType::of::<Tick>());
        assert_eq!(EventType::of::<Greet>().name(), "Greet");
        assert_eq!(EventType::of::<Tick>().to_string(), "Tick");
    }

    #[test]
    fn test_short_type_name_keeps_generics() {
        use crate::event::short_type_name;
        assert_eq!(short_type_name("a::b::Wrapper<c::D>"), "Wrapper<c::D>");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
