use tabscribe::Platform;

#[test]
fn test_identify_google_meet() {
    assert_eq!(
        Platform::identify("https://meet.google.com/x"),
        Platform::GoogleMeet
    );
}

#[test]
fn test_identify_zoom() {
    assert_eq!(Platform::identify("https://zoom.us/j/1"), Platform::Zoom);
}

#[test]
fn test_identify_teams() {
    assert_eq!(
        Platform::identify("https://teams.microsoft.com/x"),
        Platform::Teams
    );
}

#[test]
fn test_identify_other() {
    assert_eq!(Platform::identify("https://example.com"), Platform::Other);
    assert_eq!(Platform::identify(""), Platform::Other);
    assert_eq!(Platform::identify("not even a url"), Platform::Other);
}

#[test]
fn test_identify_priority_prefers_meet() {
    // Degenerate multi-match URL: Meet wins over Zoom.
    assert_eq!(
        Platform::identify("https://meet.google.com/?next=zoom.us"),
        Platform::GoogleMeet
    );
}

#[test]
fn test_platform_wire_tags() {
    assert_eq!(
        serde_json::to_string(&Platform::GoogleMeet).unwrap(),
        "\"GOOGLE_MEET\""
    );
    assert_eq!(serde_json::to_string(&Platform::Zoom).unwrap(), "\"ZOOM\"");
    assert_eq!(serde_json::to_string(&Platform::Teams).unwrap(), "\"TEAMS\"");
    assert_eq!(serde_json::to_string(&Platform::Other).unwrap(), "\"OTHER\"");
}
