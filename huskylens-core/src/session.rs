//! Session state for a HuskyLens connection
//!
//! A session tracks:
//! - Protocol version (detected once, never changes afterwards)
//! - Link state (outcome of the last knock)
//! - Currently active algorithm

use std::fmt;

use huskylens_types::Algorithm;

use crate::error::{Error, Result};

/// Wire protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// First-generation firmware: 3-byte magic, fixed 10-byte results
    V1,

    /// HuskyLens 2: algorithm byte in every frame, variable results
    V2,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("V1"),
            Self::V2 => f.write_str("V2"),
        }
    }
}

/// Link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No knock attempted yet
    #[default]
    Unprobed,

    /// Last knock was acknowledged
    Connected,

    /// Last knock went unanswered
    Disconnected,
}

/// What an algorithm request has to put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmSwitch {
    /// Already active, nothing to send
    Unchanged,

    /// Send the switch command and confirm with a knock
    Send,
}

/// Session state
///
/// Owned by a single driver; every mutation takes `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct Session {
    version: Option<ProtocolVersion>,
    state: LinkState,
    algorithm: Algorithm,
}

impl Session {
    /// Create a session with no known version
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a known version
    pub fn with_version(version: ProtocolVersion) -> Self {
        Self {
            version: Some(version),
            ..Self::default()
        }
    }

    pub fn version(&self) -> Option<ProtocolVersion> {
        self.version
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Check if the last knock succeeded
    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Currently active algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Record the detected protocol version
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSessionState`] if a version is already set.
    pub fn set_version(&mut self, version: ProtocolVersion) -> Result<()> {
        if let Some(current) = self.version {
            return Err(Error::InvalidSessionState(format!(
                "Protocol version already set to {}",
                current
            )));
        }

        self.version = Some(version);
        Ok(())
    }

    /// Record a knock outcome
    pub fn record_knock(&mut self, acknowledged: bool) {
        self.state = if acknowledged {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };
    }

    /// Decide whether switching to `requested` needs a command
    ///
    /// V2 skips requests for the active algorithm. V1 always resends.
    pub fn plan_switch(&self, requested: Algorithm) -> AlgorithmSwitch {
        match self.version {
            Some(ProtocolVersion::V2) if requested == self.algorithm => AlgorithmSwitch::Unchanged,
            _ => AlgorithmSwitch::Send,
        }
    }

    /// Make `algorithm` the active one after a confirmed switch
    pub fn commit_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.version(), None);
        assert_eq!(session.state(), LinkState::Unprobed);
        assert!(!session.is_connected());
        assert_eq!(session.algorithm(), Algorithm::ObjectRecognition);
    }

    #[test]
    fn test_set_version_once() {
        let mut session = Session::new();
        session.set_version(ProtocolVersion::V1).unwrap();
        assert_eq!(session.version(), Some(ProtocolVersion::V1));

        assert!(matches!(
            session.set_version(ProtocolVersion::V2),
            Err(Error::InvalidSessionState(_))
        ));
        assert_eq!(session.version(), Some(ProtocolVersion::V1));
    }

    #[test]
    fn test_knock_transitions() {
        let mut session = Session::with_version(ProtocolVersion::V2);

        session.record_knock(true);
        assert_eq!(session.state(), LinkState::Connected);

        session.record_knock(false);
        assert_eq!(session.state(), LinkState::Disconnected);
        assert!(!session.is_connected());

        // Disconnected is not terminal
        session.record_knock(true);
        assert!(session.is_connected());
    }

    #[test]
    fn test_plan_switch_v2_skips_active() {
        let mut session = Session::with_version(ProtocolVersion::V2);
        assert_eq!(
            session.plan_switch(Algorithm::ObjectRecognition),
            AlgorithmSwitch::Unchanged
        );
        assert_eq!(
            session.plan_switch(Algorithm::LineTracking),
            AlgorithmSwitch::Send
        );

        session.commit_algorithm(Algorithm::LineTracking);
        assert_eq!(
            session.plan_switch(Algorithm::LineTracking),
            AlgorithmSwitch::Unchanged
        );
    }

    #[test]
    fn test_plan_switch_v1_always_sends() {
        let session = Session::with_version(ProtocolVersion::V1);
        assert_eq!(
            session.plan_switch(Algorithm::ObjectRecognition),
            AlgorithmSwitch::Send
        );
    }
}
