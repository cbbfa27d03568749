//! Letter grade scale
//!
//! Scale: A (70-100), B (60-69), C (50-59), D (45-49), E (40-44), F (0-39)

use serde::{Deserialize, Serialize};

/// Letter grade for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Map a score to its grade band
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::A
        } else if score >= 60.0 {
            Self::B
        } else if score >= 50.0 {
            Self::C
        } else if score >= 45.0 {
            Self::D
        } else if score >= 40.0 {
            Self::E
        } else {
            // NaN lands here too
            Self::F
        }
    }

    /// Grade points on a 5.0 scale
    pub fn points(&self) -> u8 {
        match self {
            Self::A => 5,
            Self::B => 4,
            Self::C => 3,
            Self::D => 2,
            Self::E => 1,
            Self::F => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            "F" => Ok(Self::F),
            _ => Err(format!("Unknown grade: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100.0), Grade::A);
        assert_eq!(Grade::from_score(70.0), Grade::A);
        assert_eq!(Grade::from_score(69.99), Grade::B);
        assert_eq!(Grade::from_score(60.0), Grade::B);
        assert_eq!(Grade::from_score(59.5), Grade::C);
        assert_eq!(Grade::from_score(50.0), Grade::C);
        assert_eq!(Grade::from_score(45.0), Grade::D);
        assert_eq!(Grade::from_score(44.9), Grade::E);
        assert_eq!(Grade::from_score(40.0), Grade::E);
        assert_eq!(Grade::from_score(39.9), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn test_grade_nan_is_f() {
        assert_eq!(Grade::from_score(f64::NAN), Grade::F);
    }

    #[test]
    fn test_grade_points() {
        assert_eq!(Grade::A.points(), 5);
        assert_eq!(Grade::C.points(), 3);
        assert_eq!(Grade::F.points(), 0);
    }

    #[test]
    fn test_grade_parse_roundtrip() {
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E, Grade::F] {
            assert_eq!(grade.as_str().parse::<Grade>().unwrap(), grade);
        }
        assert_eq!("b".parse::<Grade>().unwrap(), Grade::B);
        assert!("Z".parse::<Grade>().is_err());
    }
}
