//! Display formatting for quantities and cooldown windows
//!
//! These strings surface directly in denial messages, so the phrasing is
//! part of the product behavior ("Limited to 2 items", "Available in 1 day
//! and 3 hours").

use crate::models::Unit;

fn plural(n: i64) -> &'static str {
    if n != 1 { "s" } else { "" }
}

/// Number display: whole values without a decimal point, fractional weight
/// values with two decimal places.
fn fmt_quantity(quantity: f64, weighed: bool) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else if weighed {
        format!("{quantity:.2}")
    } else {
        format!("{quantity}")
    }
}

/// Format a quantity with its unit, e.g. "3 items", "1.50 kg".
pub fn quantity_with_unit(quantity: f64, unit: Unit) -> String {
    match unit {
        Unit::Item => {
            let suffix = if quantity == 1.0 { "item" } else { "items" };
            format!("{} {}", fmt_quantity(quantity, false), suffix)
        }
        Unit::Kg | Unit::Lb => {
            format!("{} {}", fmt_quantity(quantity, true), unit.label())
        }
    }
}

/// Format a cooldown window for display, e.g. "7 days", "1 day and 30 minutes".
pub fn time_restriction(days: i64, minutes: i64) -> String {
    if days == 0 && minutes == 0 {
        return "No restriction".to_string();
    }

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} day{}", days, plural(days)));
    }
    if minutes > 0 {
        parts.push(format!("{} minute{}", minutes, plural(minutes)));
    }
    parts.join(" and ")
}

/// Format remaining cooldown minutes for display.
pub fn remaining_time(minutes: i64) -> String {
    if minutes <= 0 {
        return "Available now".to_string();
    }

    if minutes < 60 {
        return format!("Available in {} minute{}", minutes, plural(minutes));
    }

    let hours = minutes / 60;
    let rem_minutes = minutes % 60;

    if hours < 24 {
        let mut result = format!("Available in {} hour{}", hours, plural(hours));
        if rem_minutes > 0 {
            result.push_str(&format!(" and {} minute{}", rem_minutes, plural(rem_minutes)));
        }
        return result;
    }

    let days = hours / 24;
    let rem_hours = hours % 24;

    let mut result = format!("Available in {} day{}", days, plural(days));
    if rem_hours > 0 {
        result.push_str(&format!(" and {} hour{}", rem_hours, plural(rem_hours)));
        if rem_minutes > 0 {
            result.push_str(&format!(" and {} minute{}", rem_minutes, plural(rem_minutes)));
        }
    } else if rem_minutes > 0 {
        result.push_str(&format!(" and {} minute{}", rem_minutes, plural(rem_minutes)));
    }
    result
}
