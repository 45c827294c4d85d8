use serde_json::Value;
use tasktalk::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_error() {
    let err = Error::InvalidArgument("bad input".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

    let err = Error::UnknownTool("rename_task".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn exit_code_operation_failed() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    assert_eq!(Error::from(io).exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn details_include_tool_name() {
    let err = Error::UnknownTool("rename_task".to_string());
    let details = err.details().expect("details");
    assert_eq!(details["tool"], Value::String("rename_task".to_string()));
    let json = serde_json::from_str::<Value>("{").unwrap_err();
    let err = Error::from(json);
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert!(err.details().is_none());
}

#[test]
fn json_error_includes_details() {
    let err = Error::InvalidConfig("bad config".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert_eq!(json.error, "Invalid configuration: bad config");
    let details = json.details.expect("details");
    assert_eq!(details["message"], Value::String("bad config".to_string()));
}
