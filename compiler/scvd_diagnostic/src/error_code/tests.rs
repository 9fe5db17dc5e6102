use super::*;

#[test]
fn test_display_matches_as_str() {
    assert_eq!(ErrorCode::E3001.to_string(), "E3001");
    assert_eq!(ErrorCode::E1002.as_str(), "E1002");
    assert_eq!(ErrorCode::E2001.description(), "constant division by zero");
}
