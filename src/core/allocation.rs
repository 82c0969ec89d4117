use tracing::debug;

use super::error::AllocationError;
use super::types::{AssetClass, MAX_PERCENT};

const DEFAULT_PERCENTAGES: [u8; 4] = [40, 30, 20, 10];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AllocationChange {
    Accepted { previous: u8 },
    /// The committed values are untouched.
    Rejected { attempted_total: u32 },
}

impl AllocationChange {
    pub fn is_accepted(self) -> bool {
        matches!(self, AllocationChange::Accepted { .. })
    }
}

/// Percentages per asset class, adjusted one slider at a time under a hard
/// 100% ceiling. Other classes are never rebalanced to make room.
#[derive(Clone, Debug)]
pub struct AllocationSet {
    percentages: [u8; 4],
    rejections: u32,
}

impl Default for AllocationSet {
    fn default() -> Self {
        Self {
            percentages: DEFAULT_PERCENTAGES,
            rejections: 0,
        }
    }
}

impl PartialEq for AllocationSet {
    fn eq(&self, other: &Self) -> bool {
        self.percentages == other.percentages
    }
}

impl Eq for AllocationSet {}

impl AllocationSet {
    /// Builds a set from explicit values. Each value must be a percentage but
    /// the total is not checked here; callers decide which total they need.
    pub fn new(
        stocks: u32,
        bonds: u32,
        real_estate: u32,
        commodities: u32,
    ) -> Result<Self, AllocationError> {
        let mut percentages = [0u8; 4];
        for (asset, value) in AssetClass::ALL
            .into_iter()
            .zip([stocks, bonds, real_estate, commodities])
        {
            if value > u32::from(MAX_PERCENT) {
                return Err(AllocationError::OutOfRange { asset, value });
            }
            percentages[asset.index()] = value as u8;
        }
        Ok(Self {
            percentages,
            rejections: 0,
        })
    }

    pub fn get(&self, asset: AssetClass) -> u8 {
        self.percentages[asset.index()]
    }

    pub fn total(&self) -> u32 {
        self.percentages.iter().map(|&v| u32::from(v)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, u8)> + '_ {
        AssetClass::ALL.into_iter().map(|asset| (asset, self.get(asset)))
    }

    /// Number of drags refused since this set was created.
    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    pub fn ensure_within_ceiling(&self) -> Result<(), AllocationError> {
        let total = self.total();
        if total > u32::from(MAX_PERCENT) {
            return Err(AllocationError::ExceedsCeiling { total });
        }
        Ok(())
    }

    pub fn set_allocation(&mut self, asset: AssetClass, new_value: u32) -> AllocationChange {
        let total_other: u32 = self
            .iter()
            .filter(|(other, _)| *other != asset)
            .map(|(_, v)| u32::from(v))
            .sum();
        let attempted_total = total_other.saturating_add(new_value);

        if attempted_total > u32::from(MAX_PERCENT) {
            self.rejections += 1;
            debug!(%asset, new_value, attempted_total, "allocation change rejected");
            return AllocationChange::Rejected { attempted_total };
        }

        let slot = &mut self.percentages[asset.index()];
        let previous = *slot;
        *slot = new_value as u8;
        AllocationChange::Accepted { previous }
    }
}
