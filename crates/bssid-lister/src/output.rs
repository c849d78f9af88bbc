//! CSV output.
//!
//! Every field is wrapped in double quotes and written verbatim. Quotes or
//! commas inside a serial number or SSID are not escaped, so such values
//! produce rows that strict CSV parsers will reject.

use std::io::{self, Write};

use xca_api::{AccessPoint, rows};

/// Column names, always written first.
pub const HEADER: [&str; 4] = ["serial", "radio", "bssid", "ssid"];

/// Write the header and one row per WLAN entry, in inventory order.
pub fn write_csv<W: Write>(out: &mut W, inventory: &[AccessPoint]) -> io::Result<()> {
    let [serial, radio, bssid, ssid] = HEADER;
    writeln!(out, "\"{serial}\",\"{radio}\",\"{bssid}\",\"{ssid}\"")?;

    for row in rows(inventory) {
        writeln!(
            out,
            "\"{}\",\"{}\",\"{}\",\"{}\"",
            row.serial_number, row.radio_index, row.bssid, row.ssid
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use xca_api::{Radio, WlanEntry};

    use super::*;

    fn render(inventory: &[AccessPoint]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, inventory).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn wlan(bssid: &str, ssid: &str) -> WlanEntry {
        WlanEntry {
            bssid: bssid.into(),
            ssid: ssid.into(),
        }
    }

    #[test]
    fn empty_inventory_renders_only_the_header() {
        assert_eq!(render(&[]), "\"serial\",\"radio\",\"bssid\",\"ssid\"\n");
    }

    #[test]
    fn single_leaf_renders_one_row() {
        let inventory: Vec<AccessPoint> = serde_json::from_str(
            r#"[{"serialNumber":"AP1","radios":[{"radioIndex":0,"wlan":[{"bssid":"AA:BB:CC:00:11:22","ssid":"Corp"}]}]}]"#,
        )
        .unwrap();

        assert_eq!(
            render(&inventory),
            "\"serial\",\"radio\",\"bssid\",\"ssid\"\n\
             \"AP1\",\"0\",\"AA:BB:CC:00:11:22\",\"Corp\"\n"
        );
    }

    #[test]
    fn multiple_access_points_keep_source_order() {
        let inventory = vec![
            AccessPoint {
                serial_number: "1234567890ABC".into(),
                radios: vec![
                    Radio {
                        radio_index: 2,
                        wlan: vec![
                            wlan("00:1F:45:00:00:12", "Corp"),
                            wlan("00:1F:45:00:00:13", ""),
                        ],
                    },
                    Radio {
                        radio_index: 1,
                        wlan: vec![wlan("00:1F:45:00:00:02", "Corp")],
                    },
                ],
                ..AccessPoint::default()
            },
            AccessPoint {
                serial_number: "NO-RADIOS".into(),
                ..AccessPoint::default()
            },
            AccessPoint {
                serial_number: "0987654321XYZ".into(),
                radios: vec![Radio {
                    radio_index: 10,
                    wlan: vec![wlan("00:1F:45:00:01:02", "Guest WiFi")],
                }],
                ..AccessPoint::default()
            },
        ];

        insta::assert_snapshot!(render(&inventory), @r#"
        "serial","radio","bssid","ssid"
        "1234567890ABC","2","00:1F:45:00:00:12","Corp"
        "1234567890ABC","2","00:1F:45:00:00:13",""
        "1234567890ABC","1","00:1F:45:00:00:02","Corp"
        "0987654321XYZ","10","00:1F:45:00:01:02","Guest WiFi"
        "#);
    }

    #[test]
    fn embedded_quotes_and_commas_are_written_verbatim() {
        let inventory = vec![AccessPoint {
            serial_number: "AP,1".into(),
            radios: vec![Radio {
                radio_index: 0,
                wlan: vec![wlan("b1", "Bob's \"fast\" net")],
            }],
            ..AccessPoint::default()
        }];

        let rendered = render(&inventory);
        let data_row = rendered.lines().nth(1).unwrap();
        assert_eq!(data_row, r#""AP,1","0","b1","Bob's "fast" net""#);
    }
}
