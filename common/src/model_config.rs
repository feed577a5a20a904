use serde::{Deserialize, Serialize};

use crate::TrfError;

/// Direction of the model mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Encoding model: stimulus to neural response
    Forward,
    /// Decoding model: neural response to stimulus
    Backward,
}

impl Direction {
    /// Numeric form of the direction, 1 for forward and -1 for backward
    #[inline(always)]
    pub fn sign(&self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = TrfError;

    fn try_from(value: i32) -> Result<Self, TrfError> {
        match value {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Backward),
            other => Err(TrfError::InvalidDirection(other)),
        }
    }
}

/// Kind of lag model to fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// One joint model over all time lags simultaneously
    Multi,
    /// Independent single-lag models, one per lag
    Single,
}

impl std::str::FromStr for Kind {
    type Err = TrfError;

    fn from_str(s: &str) -> Result<Self, TrfError> {
        match s {
            "multi" => Ok(Self::Multi),
            "single" => Ok(Self::Single),
            other => Err(TrfError::InvalidKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_from_numeric() {
        if let Err(_) = pretty_env_logger::try_init() {}

        assert_eq!(Direction::try_from(1).unwrap(), Direction::Forward);
        assert_eq!(Direction::try_from(-1).unwrap(), Direction::Backward);
        assert!(Direction::try_from(0).is_err());
        log::info!("direction sign: {}", Direction::Backward.sign());
        assert_eq!(Direction::Backward.sign(), -1);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("multi".parse::<Kind>().unwrap(), Kind::Multi);
        assert_eq!("single".parse::<Kind>().unwrap(), Kind::Single);
        assert!("banded".parse::<Kind>().is_err());
    }
}
