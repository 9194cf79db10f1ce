//! The generator's overall lifecycle state.

/// Overall state of a time station signal generator.
///
/// Transitions form a cycle: `Idle -> Startup -> ReqParams -> LoadParams ->
/// FadeIn -> Running -> FadeOut -> Suspend -> Idle`. A stop requested
/// before `FadeIn` short-circuits straight back to `Idle` since nothing
/// audible has started yet; that shortcut lives in the coordinator that
/// drives this state, not here.
///
/// [`crate::WaveformCtx::generate`] only inspects this to decide fade
/// direction; every other transition belongs to whatever owns the state
/// cell.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    /// Default state, entered on construction and after a full shutdown.
    Idle = 0,
    /// A start was requested; waiting out the initial transition delay.
    Startup = 1,
    /// Waiting for the controller to supply user params.
    ReqParams = 2,
    /// Params were supplied; the render loop is about to (re)initialize.
    LoadParams = 3,
    /// Ramping gain up from silence.
    FadeIn = 4,
    /// Steady-state signal generation.
    Running = 5,
    /// Ramping gain down to silence.
    FadeOut = 6,
    /// Waiting out the shutdown delay before returning to `Idle`.
    Suspend = 7,
}

/// Raw state value was outside `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid lifecycle state: {0}")]
pub struct InvalidLifecycleState(pub u8);

impl TryFrom<u8> for LifecycleState {
    type Error = InvalidLifecycleState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LifecycleState::Idle),
            1 => Ok(LifecycleState::Startup),
            2 => Ok(LifecycleState::ReqParams),
            3 => Ok(LifecycleState::LoadParams),
            4 => Ok(LifecycleState::FadeIn),
            5 => Ok(LifecycleState::Running),
            6 => Ok(LifecycleState::FadeOut),
            7 => Ok(LifecycleState::Suspend),
            _ => Err(InvalidLifecycleState(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        for raw in 0u8..8 {
            assert_eq!(LifecycleState::try_from(raw).unwrap() as u8, raw);
        }
    }

    #[test]
    fn invalid_raw_state_is_rejected() {
        assert_eq!(LifecycleState::try_from(8), Err(InvalidLifecycleState(8)));
    }

    #[test]
    fn fade_in_is_the_cutoff_for_the_stop_fast_path() {
        assert!(LifecycleState::ReqParams < LifecycleState::FadeIn);
        assert!(LifecycleState::Running >= LifecycleState::FadeIn);
    }
}
