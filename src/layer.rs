//! Board layer identity (spec.md §3.2).
//!
//! Layers are a closed enumeration keyed by a stable numeric index, mirroring
//! the teacher's `Layer` enum in `pcblib/primitives.rs` (one variant per
//! named layer, `as_str`/`parse` round trip, explicit serde names) but
//! reshaped around the DRC's actual needs: a copper stack of unbounded depth
//! (represented by ordinal, not by a fixed variant per inner layer) plus a
//! fixed set of non-copper layers the checks reference by name.

use serde::{Deserialize, Serialize};

use crate::error::DrcError;

/// A board layer. Copper layers carry an ordinal (`0` = top, increasing
/// inward, last = bottom); every other layer is one of a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Layer {
    /// A copper layer identified by its position in the stack.
    Copper { ordinal: u32, stack_depth: u32 },
    BoardOutlines,
    BoardCutouts,
    BoardPlatedCutouts,
    TopStopMask,
    BotStopMask,
    TopSolderPaste,
    BotSolderPaste,
    TopLegend,
    BotLegend,
    TopDocumentation,
    BotDocumentation,
    TopPackageOutlines,
    BotPackageOutlines,
    TopCourtyard,
    BotCourtyard,
    TopGlue,
    BotGlue,
}

impl Layer {
    #[must_use]
    pub const fn top_copper(stack_depth: u32) -> Self {
        Self::Copper {
            ordinal: 0,
            stack_depth,
        }
    }

    #[must_use]
    pub fn bot_copper(stack_depth: u32) -> Self {
        Self::Copper {
            ordinal: stack_depth.saturating_sub(1),
            stack_depth,
        }
    }

    #[must_use]
    pub const fn is_copper(self) -> bool {
        matches!(self, Self::Copper { .. })
    }

    #[must_use]
    pub fn copper_number(self) -> Option<u32> {
        match self {
            Self::Copper { ordinal, .. } => Some(ordinal),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_top(self) -> bool {
        match self {
            Self::Copper { ordinal, .. } => ordinal == 0,
            Self::TopStopMask
            | Self::TopSolderPaste
            | Self::TopLegend
            | Self::TopDocumentation
            | Self::TopPackageOutlines
            | Self::TopCourtyard
            | Self::TopGlue => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_bottom(self) -> bool {
        match self {
            Self::Copper { ordinal, stack_depth } => stack_depth > 0 && ordinal == stack_depth - 1,
            Self::BotStopMask
            | Self::BotSolderPaste
            | Self::BotLegend
            | Self::BotDocumentation
            | Self::BotPackageOutlines
            | Self::BotCourtyard
            | Self::BotGlue => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_inner(self) -> bool {
        matches!(self, Self::Copper { .. }) && !self.is_top() && !self.is_bottom()
    }

    /// Whether polygons on this layer represent filled areas rather than
    /// strokes (package outlines and courtyard are stroke-only by
    /// convention; everything else may be filled).
    #[must_use]
    pub fn supports_fill(self) -> bool {
        !matches!(self, Self::TopCourtyard | Self::BotCourtyard)
    }

    #[must_use]
    pub fn stop_mask_for(top: bool) -> Self {
        if top {
            Self::TopStopMask
        } else {
            Self::BotStopMask
        }
    }

    #[must_use]
    pub fn package_outlines_for(top: bool) -> Self {
        if top {
            Self::TopPackageOutlines
        } else {
            Self::BotPackageOutlines
        }
    }

    #[must_use]
    pub fn documentation_for(top: bool) -> Self {
        if top {
            Self::TopDocumentation
        } else {
            Self::BotDocumentation
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copper { .. } => "copper",
            Self::BoardOutlines => "board_outlines",
            Self::BoardCutouts => "board_cutouts",
            Self::BoardPlatedCutouts => "board_plated_cutouts",
            Self::TopStopMask => "top_stop_mask",
            Self::BotStopMask => "bot_stop_mask",
            Self::TopSolderPaste => "top_solder_paste",
            Self::BotSolderPaste => "bot_solder_paste",
            Self::TopLegend => "top_legend",
            Self::BotLegend => "bot_legend",
            Self::TopDocumentation => "top_documentation",
            Self::BotDocumentation => "bot_documentation",
            Self::TopPackageOutlines => "top_package_outlines",
            Self::BotPackageOutlines => "bot_package_outlines",
            Self::TopCourtyard => "top_courtyard",
            Self::BotCourtyard => "bot_courtyard",
            Self::TopGlue => "top_glue",
            Self::BotGlue => "bot_glue",
        }
    }

    /// Looks up a layer by its board-file identifier. Unknown identifiers
    /// are a hard error — see spec.md §9 Open Questions: the legacy source
    /// silently fell back with a "TODO"; the expanded spec makes this a
    /// `DrcError::Logic` instead.
    pub fn parse_non_copper(id: &str) -> Result<Self, DrcError> {
        Ok(match id {
            "board_outlines" => Self::BoardOutlines,
            "board_cutouts" => Self::BoardCutouts,
            "board_plated_cutouts" => Self::BoardPlatedCutouts,
            "top_stop_mask" => Self::TopStopMask,
            "bot_stop_mask" => Self::BotStopMask,
            "top_solder_paste" => Self::TopSolderPaste,
            "bot_solder_paste" => Self::BotSolderPaste,
            "top_legend" => Self::TopLegend,
            "bot_legend" => Self::BotLegend,
            "top_documentation" => Self::TopDocumentation,
            "bot_documentation" => Self::BotDocumentation,
            "top_package_outlines" => Self::TopPackageOutlines,
            "bot_package_outlines" => Self::BotPackageOutlines,
            "top_courtyard" => Self::TopCourtyard,
            "bot_courtyard" => Self::BotCourtyard,
            "top_glue" => Self::TopGlue,
            "bot_glue" => Self::BotGlue,
            other => {
                return Err(DrcError::logic(format!("unrecognized board layer id: {other}")));
            }
        })
    }
}

/// A via's span on the copper stack: `(start, end)`, both inclusive, as
/// copper ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpan {
    pub start: u32,
    pub end: u32,
}

impl LayerSpan {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// `true` iff copper ordinal `ordinal` lies within this span, inclusive.
    #[must_use]
    pub fn contains(self, ordinal: u32) -> bool {
        self.start <= ordinal && ordinal <= self.end
    }

    /// Intersection of two spans on the copper ordinal axis, or `None` if
    /// disjoint — used by the Cu↔Cu layer-span-gating invariant (spec.md §8).
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }

    /// `true` iff exactly one end of the span is the outermost layer of a
    /// `stack_depth`-deep stack — the definition of a blind via.
    #[must_use]
    pub fn is_blind(self, stack_depth: u32) -> bool {
        let last = stack_depth.saturating_sub(1);
        let at_top = self.start == 0;
        let at_bottom = self.end == last;
        at_top != at_bottom
    }

    /// `true` iff neither end of the span is the outermost layer — the
    /// definition of a buried via.
    #[must_use]
    pub fn is_buried(self, stack_depth: u32) -> bool {
        let last = stack_depth.saturating_sub(1);
        self.start != 0 && self.end != last
    }
}
