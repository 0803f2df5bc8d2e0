use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrailError>;

#[derive(Debug, Error)]
pub enum TrailError {
    #[error("width curve has {len} keyframes, at most {max} are allowed")]
    WidthCurveTooLong { len: usize, max: usize },

    #[error("keyframe {index} is not finite (time {time}, value {value})")]
    NonFiniteKeyframe { index: usize, time: f32, value: f32 },

    #[error("gradient has {len} color keys, at most {max} are allowed")]
    TooManyColorKeys { len: usize, max: usize },

    #[error("gradient has {len} alpha keys, at most {max} are allowed")]
    TooManyAlphaKeys { len: usize, max: usize },

    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("frame time {0} is not finite")]
    NonFiniteTime(f64),

    #[error("frame time {now} is not after the newest point ({newest})")]
    TimeNotIncreasing { now: f64, newest: f64 },

    #[error("trail has been destroyed")]
    Destroyed,

    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(String),

    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrailError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
