//! Freeze-cycle inference.
//!
//! Finfish harvested in one country and shipped to a processing hub is
//! thawed, cut and refrozen there, so it reaches the buyer twice-frozen.

use serde::Serialize;

use crate::alias::AliasIndex;
use crate::reference::ProductClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FreezeCycle {
    Single,
    Twice,
}

impl FreezeCycle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Twice => "TWICE",
        }
    }
}

/// Where processing happened relative to harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingGeography {
    NoProcessingCountry,
    SameAsHarvest,
    TwiceFrozenHub,
    OtherProcessor,
}

impl ProcessingGeography {
    pub fn classify(index: &AliasIndex, harvest: Option<&str>, processed: Option<&str>) -> Self {
        let Some(processed) = processed else {
            return Self::NoProcessingCountry;
        };
        if harvest == Some(processed) {
            return Self::SameAsHarvest;
        }
        if index.is_twice_frozen_processor(processed) {
            return Self::TwiceFrozenHub;
        }
        Self::OtherProcessor
    }
}

pub fn infer_freeze_cycle(
    class: Option<ProductClass>,
    fresh: bool,
    geography: ProcessingGeography,
) -> Option<FreezeCycle> {
    if class != Some(ProductClass::Finfish) || fresh {
        return None;
    }
    match geography {
        ProcessingGeography::NoProcessingCountry => None,
        ProcessingGeography::SameAsHarvest => Some(FreezeCycle::Single),
        ProcessingGeography::TwiceFrozenHub => Some(FreezeCycle::Twice),
        ProcessingGeography::OtherProcessor => Some(FreezeCycle::Single),
    }
}

#[cfg(test)]
mod tests {
    use super::{FreezeCycle, ProcessingGeography, infer_freeze_cycle};
    use crate::alias::builtin;
    use crate::reference::ProductClass;

    const FINFISH: Option<ProductClass> = Some(ProductClass::Finfish);

    #[test]
    fn decision_table_for_finfish() {
        assert_eq!(
            infer_freeze_cycle(FINFISH, false, ProcessingGeography::NoProcessingCountry),
            None
        );
        assert_eq!(
            infer_freeze_cycle(FINFISH, false, ProcessingGeography::SameAsHarvest),
            Some(FreezeCycle::Single)
        );
        assert_eq!(
            infer_freeze_cycle(FINFISH, false, ProcessingGeography::TwiceFrozenHub),
            Some(FreezeCycle::Twice)
        );
        assert_eq!(
            infer_freeze_cycle(FINFISH, false, ProcessingGeography::OtherProcessor),
            Some(FreezeCycle::Single)
        );
    }

    #[test]
    fn fresh_and_non_finfish_have_no_freeze_cycle() {
        assert_eq!(
            infer_freeze_cycle(FINFISH, true, ProcessingGeography::TwiceFrozenHub),
            None
        );
        assert_eq!(
            infer_freeze_cycle(
                Some(ProductClass::Crustacean),
                false,
                ProcessingGeography::TwiceFrozenHub
            ),
            None
        );
        assert_eq!(
            infer_freeze_cycle(None, false, ProcessingGeography::TwiceFrozenHub),
            None
        );
    }

    #[test]
    fn classifies_processing_geography() {
        let index = builtin();
        assert!(index.is_ok());
        if let Ok(index) = index {
            assert_eq!(
                ProcessingGeography::classify(&index, Some("USA"), None),
                ProcessingGeography::NoProcessingCountry
            );
            assert_eq!(
                ProcessingGeography::classify(&index, Some("CHN"), Some("CHN")),
                ProcessingGeography::SameAsHarvest
            );
            assert_eq!(
                ProcessingGeography::classify(&index, Some("USA"), Some("CHN")),
                ProcessingGeography::TwiceFrozenHub
            );
            assert_eq!(
                ProcessingGeography::classify(&index, None, Some("VNM")),
                ProcessingGeography::TwiceFrozenHub
            );
            assert_eq!(
                ProcessingGeography::classify(&index, Some("NOR"), Some("POL")),
                ProcessingGeography::OtherProcessor
            );
        }
    }
}
