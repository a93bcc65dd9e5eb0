use std::fmt;

use serde::Serialize;

use super::SleepError;

/// Sleep stage values of the `com.google.sleep.segment` data type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStage {
    Awake,
    Sleep,
    OutOfBed,
    LightSleep,
    DeepSleep,
    Rem,
}

/// Stages counted toward total sleep time.
pub const ASLEEP_STAGES: [SleepStage; 4] = [
    SleepStage::Sleep,
    SleepStage::LightSleep,
    SleepStage::DeepSleep,
    SleepStage::Rem,
];

pub const AWAKE_STAGES: [SleepStage; 1] = [SleepStage::Awake];

impl SleepStage {
    pub fn from_code(code: i64) -> Result<Self, SleepError> {
        match code {
            1 => Ok(Self::Awake),
            2 => Ok(Self::Sleep),
            3 => Ok(Self::OutOfBed),
            4 => Ok(Self::LightSleep),
            5 => Ok(Self::DeepSleep),
            6 => Ok(Self::Rem),
            other => Err(SleepError::UnknownStage(other)),
        }
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::Awake => 1,
            Self::Sleep => 2,
            Self::OutOfBed => 3,
            Self::LightSleep => 4,
            Self::DeepSleep => 5,
            Self::Rem => 6,
        }
    }

    pub fn is_asleep(self) -> bool {
        ASLEEP_STAGES.contains(&self)
    }

    pub fn is_awake(self) -> bool {
        AWAKE_STAGES.contains(&self)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::Sleep => "sleep",
            Self::OutOfBed => "out_of_bed",
            Self::LightSleep => "light_sleep",
            Self::DeepSleep => "deep_sleep",
            Self::Rem => "rem",
        }
    }
}

impl TryFrom<i64> for SleepStage {
    type Error = SleepError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for SleepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw stage code to its stage.
pub fn classify(code: i64) -> Result<SleepStage, SleepError> {
    SleepStage::from_code(code)
}

pub fn is_asleep(stage: SleepStage) -> bool {
    stage.is_asleep()
}

pub fn is_awake(stage: SleepStage) -> bool {
    stage.is_awake()
}
