//! Price arithmetic for catalogue entries. Amounts are whole currency units.

/// Percentage discount of `offer` relative to `regular`, rounded half-up.
///
/// Returns `None` when the regular price is not positive, since no meaningful
/// percentage exists.
pub fn offer_percentage(regular: i64, offer: i64) -> Option<i32> {
    if regular <= 0 {
        return None;
    }
    let regular = i128::from(regular);
    let offer = i128::from(offer);
    let rounded = (200 * (regular - offer) + regular).div_euclid(2 * regular);
    Some(rounded.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32)
}
