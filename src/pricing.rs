use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::availability::Stay;
use crate::models::room::Room;

/// Per night, per adult beyond the ones included in the base rate.
pub const EXTRA_ADULT_RATE: Decimal = dec!(1000);
/// Per night, per child. Applied regardless of age.
pub const CHILD_RATE: Decimal = dec!(500);
pub const TAX_RATE: Decimal = dec!(0.12);
pub const INCLUDED_ADULTS: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    pub extra_adult_rate: Decimal,
    pub child_rate: Decimal,
    pub tax_rate: Decimal,
    pub included_adults: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            extra_adult_rate: EXTRA_ADULT_RATE,
            child_rate: CHILD_RATE,
            tax_rate: TAX_RATE,
            included_adults: INCLUDED_ADULTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party {
    pub adults: u32,
    pub children: u32,
}

impl Party {
    pub fn new(adults: u32, children: u32) -> Self {
        Self { adults, children }
    }

    pub fn size(&self) -> u32 {
        self.adults + self.children
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("At least one adult is required")]
    NoAdults,

    #[error("This room accommodates at most {max_occupancy} guests ({requested} requested)")]
    CapacityExceeded { requested: u32, max_occupancy: u32 },

    #[error("Check-out date must be after check-in date")]
    EmptyStay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub nightly_rate: Decimal,
    pub nights: i64,
    pub extra_adults: u32,
    pub extra_adult_rate: Decimal,
    pub children: u32,
    pub child_rate: Decimal,
    pub tax_rate: Decimal,
    pub base_price: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub tax: Decimal,
    pub total_price: Decimal,
    pub nights: i64,
    pub breakdown: PriceBreakdown,
}

pub fn check_capacity(room: &Room, party: Party) -> Result<(), PricingError> {
    if party.adults == 0 {
        return Err(PricingError::NoAdults);
    }
    if party.size() > room.max_occupancy {
        return Err(PricingError::CapacityExceeded {
            requested: party.size(),
            max_occupancy: room.max_occupancy,
        });
    }
    Ok(())
}

/// Prices a stay for `party` in `room`.
///
/// The first `policy.included_adults` adults are covered by the room's
/// base rate; every further adult and every child adds a flat nightly
/// surcharge. Tax is the exact product of the base price and the tax rate.
pub fn compute_price(
    policy: &PricingPolicy,
    room: &Room,
    stay: &Stay,
    party: Party,
) -> Result<PriceQuote, PricingError> {
    check_capacity(room, party)?;

    let nights = stay.nights();
    if nights < 1 {
        return Err(PricingError::EmptyStay);
    }

    let extra_adults = party.adults.saturating_sub(policy.included_adults);
    let n = Decimal::from(nights);

    let base_price = room.base_rate * n
        + Decimal::from(extra_adults) * policy.extra_adult_rate * n
        + Decimal::from(party.children) * policy.child_rate * n;
    let tax = base_price * policy.tax_rate;
    let total_price = base_price + tax;

    Ok(PriceQuote {
        base_price,
        tax,
        total_price,
        nights,
        breakdown: PriceBreakdown {
            nightly_rate: room.base_rate,
            nights,
            extra_adults,
            extra_adult_rate: policy.extra_adult_rate,
            children: party.children,
            child_rate: policy.child_rate,
            tax_rate: policy.tax_rate,
            base_price,
            tax,
        },
    })
}
