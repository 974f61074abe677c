/// Pro-rata slice of `total` owed to `part` out of `whole`, rounded down.
///
/// Formula: slice = total × part / whole
///
/// Example:
/// - total received: 1,000
/// - part: 200 shares of 350
/// - slice: 1,000 × 200 / 350 = 571 (571.43 floored)
pub fn pro_rata(total: i128, part: i128, whole: i128) -> Option<i128> {
    if whole <= 0 {
        return Some(0);
    }
    total.checked_mul(part)?.checked_div(whole)
}

/// Amount still claimable after `already` has been paid out, floored at zero.
pub fn pending(total: i128, part: i128, whole: i128, already: i128) -> Option<i128> {
    let entitled = pro_rata(total, part, whole)?;
    Some(entitled.checked_sub(already)?.max(0))
}
