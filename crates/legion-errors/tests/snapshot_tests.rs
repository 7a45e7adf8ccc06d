//! Snapshot tests for error message formatting.
//!
//! These tests pin the user-visible wording of errors that end up in logs.

use insta::assert_snapshot;
use legion_errors::{ConfigError, LegionError, MotionFault, ValidationError};

#[test]
fn test_unreachable_message() {
    assert_snapshot!(MotionFault::Unreachable.to_string(), @"Site outside leg workspace");
}

#[test]
fn test_joint_out_of_range_message() {
    assert_snapshot!(MotionFault::JointOutOfRange.to_string(), @"Joint angle outside actuator range");
}

#[test]
fn test_wrapped_fault_message() {
    let err: LegionError = MotionFault::InvalidCommand.into();
    assert_snapshot!(err.to_string(), @"Motion fault: Invalid motion command");
}

#[test]
fn test_invalid_config_message() {
    let err: ConfigError = ValidationError::out_of_range("steps", 0, 1, 64).into();
    assert_snapshot!(err.to_string(), @"Invalid configuration: steps value 0 is out of range [1, 64]");
}

#[test]
fn test_parse_error_message() {
    let err = ConfigError::parse("robot.json", "expected value at line 1 column 1");
    assert_snapshot!(
        err.to_string(),
        @"Failed to parse configuration from robot.json: expected value at line 1 column 1"
    );
}
