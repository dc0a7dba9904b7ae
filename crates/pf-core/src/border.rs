use core::fmt;
use core::str::FromStr;

use crate::Error;

/// Policy for resolving out-of-range coordinates.
///
/// `Reflect` mirrors around the edge sample without repeating it
/// (reflect-101: `-1 -> 1`, `len -> len - 2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode<T> {
    Reflect,
    Replicate,
    Wrap,
    Constant(T),
}

impl<T> BorderMode<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reflect => "reflect",
            Self::Replicate => "replicate",
            Self::Wrap => "wrap",
            Self::Constant(_) => "constant",
        }
    }

    pub fn cast<U: From<T>>(self) -> BorderMode<U> {
        match self {
            Self::Reflect => BorderMode::Reflect,
            Self::Replicate => BorderMode::Replicate,
            Self::Wrap => BorderMode::Wrap,
            Self::Constant(v) => BorderMode::Constant(U::from(v)),
        }
    }
}

impl BorderMode<u8> {
    /// Builds a mode from its name; `border_value` is only kept for `constant`.
    pub fn from_name(name: &str, border_value: u8) -> Result<Self, Error> {
        match name.parse::<BorderKind>()? {
            BorderKind::Reflect => Ok(Self::Reflect),
            BorderKind::Replicate => Ok(Self::Replicate),
            BorderKind::Wrap => Ok(Self::Wrap),
            BorderKind::Constant => Ok(Self::Constant(border_value)),
        }
    }
}

impl Default for BorderMode<u8> {
    fn default() -> Self {
        Self::Reflect
    }
}

/// Border mode without its fill value, as it appears at string boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderKind {
    Reflect,
    Replicate,
    Wrap,
    Constant,
}

impl BorderKind {
    pub const ALL: [BorderKind; 4] = [
        BorderKind::Reflect,
        BorderKind::Replicate,
        BorderKind::Wrap,
        BorderKind::Constant,
    ];

    pub fn with_value(self, border_value: u8) -> BorderMode<u8> {
        match self {
            Self::Reflect => BorderMode::Reflect,
            Self::Replicate => BorderMode::Replicate,
            Self::Wrap => BorderMode::Wrap,
            Self::Constant => BorderMode::Constant(border_value),
        }
    }
}

impl FromStr for BorderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reflect" => Ok(Self::Reflect),
            "replicate" => Ok(Self::Replicate),
            "wrap" => Ok(Self::Wrap),
            "constant" => Ok(Self::Constant),
            other => Err(Error::invalid_parameter(format!(
                "border must be one of reflect, replicate, wrap, constant (got `{other}`)"
            ))),
        }
    }
}

impl fmt::Display for BorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.with_value(0).name())
    }
}

pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if i >= 0 && (i as usize) < len {
        return Some(i as usize);
    }

    match mode {
        BorderMode::Constant(_) => None,
        BorderMode::Replicate => {
            if i < 0 {
                Some(0)
            } else {
                Some(len - 1)
            }
        }
        BorderMode::Wrap => Some(i.rem_euclid(len as isize) as usize),
        BorderMode::Reflect => {
            if len == 1 {
                return Some(0);
            }

            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                Some(r)
            } else {
                Some((2 * len - 2) - r)
            }
        }
    }
}

/// Precomputed mapping for coordinates `-radius .. len + radius`.
///
/// Entry `k` resolves coordinate `k - radius`; `None` means the caller must
/// substitute the constant border value. Fails with `InvalidParameter` when
/// the padded span does not fit in `isize`.
pub fn index_table<T>(
    len: usize,
    radius: usize,
    mode: &BorderMode<T>,
) -> Result<Vec<Option<usize>>, Error> {
    let span = radius
        .checked_mul(2)
        .and_then(|pad| pad.checked_add(len))
        .filter(|&span| span <= isize::MAX as usize)
        .ok_or_else(|| {
            Error::invalid_parameter(format!(
                "border padding overflows: len {len}, radius {radius}"
            ))
        })?;
    Ok((0..span)
        .map(|k| map_index(k as isize - radius as isize, len, mode))
        .collect())
}
