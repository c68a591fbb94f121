// crates/framestrip-core/src/helpers/display.rs
//
// Human-readable formatting for probed metadata and frame timestamps.
// Shared by the CLI and any rendering host; no display context required.

/// Format a timestamp in seconds as `M:SS`, or `H:MM:SS` once it passes
/// the hour mark.
///
/// ```
/// use framestrip_core::helpers::display::format_timestamp;
/// assert_eq!(format_timestamp(0.0),    "0:00");
/// assert_eq!(format_timestamp(90.0),   "1:30");
/// assert_eq!(format_timestamp(3725.0), "1:02:05");
/// ```
pub fn format_timestamp(secs: f64) -> String {
    let total = secs as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Format a byte count with binary thresholds and decimal-style labels.
///
/// ```
/// use framestrip_core::helpers::display::format_file_size;
/// assert_eq!(format_file_size(512),           "512 B");
/// assert_eq!(format_file_size(2048),          "2 KB");
/// assert_eq!(format_file_size(5_242_880),     "5.0 MB");
/// assert_eq!(format_file_size(1_610_612_736), "1.50 GB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const GIB: u64 = 1_073_741_824;
    const MIB: u64 = 1_048_576;
    if bytes >= GIB {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= 1024 {
        format!("{:.0} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Format bits per second.
///
/// ```
/// use framestrip_core::helpers::display::format_bitrate;
/// assert_eq!(format_bitrate(800),       "800 bps");
/// assert_eq!(format_bitrate(96_000),    "96 kbps");
/// assert_eq!(format_bitrate(2_500_000), "2.5 Mbps");
/// ```
pub fn format_bitrate(bps: u64) -> String {
    if bps >= 1_000_000 {
        format!("{:.1} Mbps", bps as f64 / 1_000_000.0)
    } else if bps >= 1_000 {
        format!("{:.0} kbps", bps as f64 / 1_000.0)
    } else {
        format!("{bps} bps")
    }
}
