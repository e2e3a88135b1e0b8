use crate::config::Config;
use crate::consts;
use crate::engine::ControlMode;
use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::error::Error;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Settings that stay the same across every screen of the application
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Globals {
    pub(crate) config: Config,

    /// The control mode to select when the application starts
    pub(crate) mode: ControlMode,

    /// File or named pipe from which an external policy's predictions are
    /// read
    pub(crate) policy: Option<PathBuf>,

    /// File to which gameplay transitions are appended
    pub(crate) telemetry: Option<PathBuf>,
}

/// Extra methods for enums with a fixed number of variants in a fixed order
pub(crate) trait EnumExt: Enum {
    fn iter() -> EnumIter<Self> {
        EnumIter {
            next: 0,
            _variants: PhantomData,
        }
    }

    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH - 1)
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize() + 1;
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EnumIter<T> {
    next: usize,
    _variants: PhantomData<T>,
}

impl<T: Enum> Iterator for EnumIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next < T::LENGTH {
            let value = T::from_usize(self.next);
            self.next += 1;
            Some(value)
        } else {
            None
        }
    }
}

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size centered in `area`, clipped to `area`
/// if it doesn't fit
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [centered] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(centered);
    centered
}

/// Render an error together with all of its sources, separated by colons
pub(crate) fn error_chain(e: &dyn Error) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(src) = source {
        s.push_str(": ");
        s.push_str(&src.to_string());
        source = src.source();
    }
    s
}
