//! What a simulated run produced, in human and JSON form.

use std::fmt;

use legion_gait::{GaitState, MotionCommand};
use legion_geometry::{LegId, Site};
use legion_kinematics::JointAngles;
use legion_scheduler::JitterSummary;
use legion_tracing::TracingMetrics;
use serde::Serialize;

use crate::frame::FRAME_CHANNELS;

/// Outcome of one scripted command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReport {
    /// Command as posted
    pub command: MotionCommand,
    /// Ticks until the robot settled, or the tick limit
    pub ticks: u64,
    /// Phases issued while it ran
    pub phases: u64,
    /// The controller refused it
    pub rejected: bool,
    /// The tick limit ran out before the robot settled
    pub timed_out: bool,
}

/// Pose of one leg at the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegReport {
    /// Which leg
    pub leg: LegId,
    /// Foot site in millimetres
    pub site: [f32; 3],
    /// Hip, thigh, knee in degrees
    pub angles: [f32; 3],
}

impl LegReport {
    /// Snapshot one leg.
    pub fn new(leg: LegId, site: Site, angles: JointAngles) -> Self {
        Self {
            leg,
            site: [site.x, site.y, site.z],
            angles: [angles.hip, angles.thigh, angles.knee],
        }
    }
}

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    /// Ticks recorded
    pub total_ticks: u64,
    /// Late ticks
    pub missed_ticks: u64,
    /// Ticks dropped after overruns
    pub skipped_ticks: u64,
    /// Median lateness in nanoseconds
    pub p50_ns: u64,
    /// 99th percentile lateness in nanoseconds
    pub p99_ns: u64,
    /// Worst lateness in nanoseconds
    pub max_ns: u64,
}

impl From<JitterSummary> for TimingReport {
    fn from(s: JitterSummary) -> Self {
        Self {
            total_ticks: s.total_ticks,
            missed_ticks: s.missed_ticks,
            skipped_ticks: s.skipped_ticks,
            p50_ns: s.p50_ns,
            p99_ns: s.p99_ns,
            max_ns: s.max_ns,
        }
    }
}

impl From<TimingReport> for JitterSummary {
    fn from(t: TimingReport) -> Self {
        Self {
            total_ticks: t.total_ticks,
            missed_ticks: t.missed_ticks,
            skipped_ticks: t.skipped_ticks,
            p50_ns: t.p50_ns,
            p99_ns: t.p99_ns,
            max_ns: t.max_ns,
        }
    }
}

/// Trace counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceReport {
    /// Phases started
    pub phases_started: u64,
    /// Sites pulled back into the workspace
    pub workspace_clamps: u64,
    /// Joint angles clamped to the actuator range
    pub joint_clamps: u64,
    /// Legs that held their previous angles
    pub sites_held: u64,
    /// Commands refused
    pub commands_rejected: u64,
    /// Times the robot parked
    pub rests_engaged: u64,
    /// Late ticks
    pub deadline_misses: u64,
    /// Mean tick processing time in nanoseconds
    pub mean_processing_ns: u64,
}

impl From<&TracingMetrics> for TraceReport {
    fn from(m: &TracingMetrics) -> Self {
        Self {
            phases_started: m.phases_started,
            workspace_clamps: m.workspace_clamps,
            joint_clamps: m.joint_clamps,
            sites_held: m.sites_held,
            commands_rejected: m.commands_rejected,
            rests_engaged: m.rests_engaged,
            deadline_misses: m.deadline_misses,
            mean_processing_ns: u64::try_from(m.average_processing_time().as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

/// Everything a run reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// One entry per scripted command
    pub commands: Vec<CommandReport>,
    /// Ticks spent idling after the script
    pub idle_ticks: u64,
    /// Total ticks run
    pub ticks: u64,
    /// Sequencer state at the end
    pub final_state: GaitState,
    /// Whether the rest controller has the robot parked
    pub parked: bool,
    /// Final pose per leg
    pub legs: Vec<LegReport>,
    /// Final value of every driver channel
    pub channels: [f32; FRAME_CHANNELS],
    /// Loop timing
    pub timing: TimingReport,
    /// Trace counters
    pub trace: TraceReport,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.commands.iter().enumerate() {
            let outcome = if c.rejected {
                "rejected"
            } else if c.timed_out {
                "timed out"
            } else {
                "done"
            };
            writeln!(
                f,
                "{:>3}. {:<10} {:>3} phases {:>6} ticks  {outcome}",
                i + 1,
                c.command.kind.as_str(),
                c.phases,
                c.ticks
            )?;
        }
        if self.idle_ticks > 0 {
            writeln!(f, "     idle       {:>17} ticks", self.idle_ticks)?;
        }
        writeln!(
            f,
            "state: {}{}",
            self.final_state.as_str(),
            if self.parked { " (parked)" } else { "" }
        )?;
        for leg in &self.legs {
            let [x, y, z] = leg.site;
            let [hip, thigh, knee] = leg.angles;
            writeln!(
                f,
                "  {:<11} site ({x:7.2}, {y:7.2}, {z:7.2})  joints ({hip:6.2}, {thigh:6.2}, {knee:6.2})",
                leg.leg.as_str()
            )?;
        }
        writeln!(f, "timing: {}", JitterSummary::from(self.timing))?;
        write!(
            f,
            "faults: {} workspace clamps, {} joint clamps, {} held, {} rejected, {} late",
            self.trace.workspace_clamps,
            self.trace.joint_clamps,
            self.trace.sites_held,
            self.trace.commands_rejected,
            self.trace.deadline_misses
        )
    }
}

/// Print `value` as pretty JSON wrapped in a success envelope.
///
/// # Errors
///
/// Returns the serializer's error if `value` cannot be encoded.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    let body = serde_json::json!({ "success": true, "result": value });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Print an error chain as JSON on stdout.
pub fn print_error_json(error: &anyhow::Error, exit_code: u8) {
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let body = serde_json::json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "causes": causes,
            "exit_code": exit_code,
        }
    });
    match serde_json::to_string_pretty(&body) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("failed to format error as JSON: {e}"),
    }
}

/// Print an error chain for a person on stderr.
pub fn print_error_human(error: &anyhow::Error) {
    eprintln!("error: {error}");
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

#[cfg(test)]
mod tests {
    use legion_gait::CommandKind;
    use legion_test_helpers::prelude::*;

    use super::*;

    #[test]
    fn test_leg_report_flattens_pose() {
        let report = LegReport::new(
            LegId::RearLeft,
            Site::new(62.0, 62.0, -50.0),
            JointAngles::new(80.0, 95.0, 100.0),
        );
        let [x, _, z] = report.site;
        let [hip, _, knee] = report.angles;
        assert_approx_eq!(x, 62.0, 1e-6);
        assert_approx_eq!(z, -50.0, 1e-6);
        assert_approx_eq!(hip, 80.0, 1e-6);
        assert_approx_eq!(knee, 100.0, 1e-6);
    }

    #[test]
    fn test_command_report_serializes_with_defaults_omitted() -> TestResult {
        let report = CommandReport {
            command: MotionCommand::new(CommandKind::Wave),
            ticks: 120,
            phases: 9,
            rejected: false,
            timed_out: false,
        };
        let json = serde_json::to_value(&report)?;
        insta::assert_snapshot!(json.to_string(), @r#"{"command":{"kind":"wave"},"phases":9,"rejected":false,"ticks":120,"timed_out":false}"#);
        Ok(())
    }
}
