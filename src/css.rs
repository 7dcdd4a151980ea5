//! Tokenizer for the supported subset of computed `background-size`,
//! `background-position`, and `background-image` values.
//!
//! Minimal hand-rolled parsing without external dependencies. This is not
//! a CSS parser: only the single-layer token grammar the measurement
//! pipeline needs. Malformed input never fails — size degrades to `cover`,
//! position tokens degrade to a zero offset — because a banner layout
//! should still produce a best-effort crop.

use crate::geometry::{PositionSpec, PositionValue, SizeSpec, SizeValue};

/// First comma-separated layer of a multi-layer background value.
///
/// Multiple background layers are unsupported; the first layer is the
/// one painted on top.
pub fn first_layer(value: &str) -> &str {
    value.split(',').next().unwrap_or(value).trim()
}

/// Parse a computed `background-size` value.
///
/// Supports `cover`, `contain`, and one- or two-token
/// length/percentage/`auto` forms. A missing second token is `auto`.
/// Any malformed token degrades the whole spec to [`SizeSpec::Cover`].
pub fn parse_size(value: &str) -> SizeSpec {
    let layer = first_layer(value);
    if layer.eq_ignore_ascii_case("cover") {
        return SizeSpec::Cover;
    }
    if layer.eq_ignore_ascii_case("contain") {
        return SizeSpec::Contain;
    }

    let mut tokens = layer.split_whitespace();
    let x = tokens.next().unwrap_or("auto");
    let y = tokens.next().unwrap_or("auto");
    match (parse_size_value(x), parse_size_value(y)) {
        (Some(x), Some(y)) => SizeSpec::Explicit { x, y },
        _ => SizeSpec::Cover,
    }
}

fn parse_size_value(token: &str) -> Option<SizeValue> {
    if token.eq_ignore_ascii_case("auto") {
        return Some(SizeValue::Auto);
    }
    if let Some(pct) = token.strip_suffix('%') {
        return pct.trim().parse().ok().map(SizeValue::Percent);
    }
    parse_px(token).map(SizeValue::Pixels)
}

/// Parse a computed `background-position` value.
///
/// Per-axis keywords map to canonical percentages (`left`/`top` → 0%,
/// `center` → 50%, `right`/`bottom` → 100%). A missing Y token defaults
/// to `50%`. Unparseable tokens resolve as a zero pixel offset.
pub fn parse_position(value: &str) -> PositionSpec {
    let layer = first_layer(value);
    let mut tokens = layer.split_whitespace();
    let x = tokens.next().unwrap_or("");
    let y = tokens.next().unwrap_or("50%");
    PositionSpec::new(
        parse_position_value(x, Axis::X),
        parse_position_value(y, Axis::Y),
    )
}

#[derive(Copy, Clone)]
enum Axis {
    X,
    Y,
}

fn parse_position_value(token: &str, axis: Axis) -> PositionValue {
    let keyword = match axis {
        Axis::X => match_keyword(token, "left", "right"),
        Axis::Y => match_keyword(token, "top", "bottom"),
    };
    if let Some(pct) = keyword {
        return PositionValue::Percent(pct);
    }
    if let Some(pct) = token.strip_suffix('%') {
        if let Ok(p) = pct.trim().parse() {
            return PositionValue::Percent(p);
        }
        return PositionValue::Pixels(0.0);
    }
    PositionValue::Pixels(parse_px(token).unwrap_or(0.0))
}

/// Keyword percentage for one axis. A keyword belonging to the other
/// axis is not recognized here and falls through to the zero fallback.
fn match_keyword(token: &str, near: &str, far: &str) -> Option<f64> {
    if token.eq_ignore_ascii_case(near) {
        Some(0.0)
    } else if token.eq_ignore_ascii_case("center") {
        Some(50.0)
    } else if token.eq_ignore_ascii_case(far) {
        Some(100.0)
    } else {
        None
    }
}

/// Parse a pixel length, with or without the `px` suffix.
fn parse_px(token: &str) -> Option<f64> {
    let token = token
        .strip_suffix("px")
        .or_else(|| token.strip_suffix("PX"))
        .unwrap_or(token);
    token.trim().parse().ok()
}

/// Extract the URL from the first `url(...)` in a computed
/// `background-image` value, stripping surrounding quotes.
///
/// Returns `None` for `none`, gradients, or an empty URL.
pub fn background_image_url(value: &str) -> Option<&str> {
    let layer = first_layer(value);
    let start = layer.find("url(")?;
    let rest = &layer[start + 4..];
    let end = rest.find(')')?;
    let url = rest[..end].trim().trim_matches(['"', '\'']);
    if url.is_empty() { None } else { Some(url) }
}
