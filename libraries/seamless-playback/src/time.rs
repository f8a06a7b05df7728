//! Time label formatting

/// Format seconds as `m:ss`, or `h:mm:ss` when `template` reaches an hour
///
/// `template` is the value the label sits next to (usually the track
/// length), so an elapsed label and its total share a shape. Without a
/// template, or with a zero one, `time` is its own template. Fractions are
/// truncated; negative input reads as zero.
pub fn format_time(time: f64, template: Option<f64>) -> String {
    let time = whole_seconds(time);
    let template = template.map(whole_seconds).filter(|t| *t > 0).unwrap_or(time);

    let seconds = time % 60;
    if template / 3600 > 0 {
        let minutes = (time / 60) % 60;
        let hours = time / 3600;
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        let minutes = time / 60;
        format!("{minutes}:{seconds:02}")
    }
}

fn whole_seconds(time: f64) -> u64 {
    if time.is_finite() && time > 0.0 {
        time.floor() as u64
    } else {
        0
    }
}
