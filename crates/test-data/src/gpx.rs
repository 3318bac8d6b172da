//! GPX file generation from track points.
//!
//! Produces valid GPX 1.1 XML, the upload format the ingestion pipeline
//! accepts. Points without elevation or timestamp simply omit those tags,
//! which is how malformed-track fixtures are built.

use std::fmt::Write;

use runlog::models::TrackPointData;
use time::format_description::well_known::Rfc3339;

/// Generates a GPX 1.1 document from track points: one track, one segment,
/// points in order with lat, lon, and any elevation/timestamp present.
pub fn generate_gpx(points: &[TrackPointData], name: &str) -> Vec<u8> {
    let mut gpx = String::with_capacity(128 + points.len() * 120);

    gpx.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    gpx.push_str(concat!(
        "<gpx version=\"1.1\" creator=\"runlog-test-data\"",
        " xmlns=\"http://www.topografix.com/GPX/1/1\"",
        " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"",
        " xsi:schemaLocation=\"http://www.topografix.com/GPX/1/1",
        " http://www.topografix.com/GPX/1/1/gpx.xsd\">\n",
    ));

    let escaped = escape_xml(name);
    let _ = writeln!(gpx, "  <metadata>\n    <name>{escaped}</name>\n  </metadata>");
    let _ = writeln!(gpx, "  <trk>\n    <name>{escaped}</name>\n    <trkseg>");

    for point in points {
        let _ = writeln!(
            gpx,
            "      <trkpt lat=\"{:.7}\" lon=\"{:.7}\">",
            point.lat, point.lon
        );
        if let Some(ele) = point.elevation {
            let _ = writeln!(gpx, "        <ele>{ele:.2}</ele>");
        }
        if let Some(ts) = point.timestamp {
            let formatted = ts.format(&Rfc3339).unwrap_or_default();
            let _ = writeln!(gpx, "        <time>{formatted}</time>");
        }
        gpx.push_str("      </trkpt>\n");
    }

    gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
    gpx.into_bytes()
}

/// Escapes XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
