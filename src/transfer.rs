use crate::error::CliError;
use crate::model::{Db, Schedule, ShareCodeEntry, WasteCategory};
use crate::schedules::{make_schedule, next_schedule_id};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::Rng;

const FAMILY_CODE_LEN: usize = 6;
const FAMILY_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// On-wire schedule entry. Ids and derived occurrence dates are excluded;
/// recipients mint their own ids at merge time.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ShareEntry {
    #[serde(rename = "type")]
    pub category: WasteCategory,
    pub name: String,
    pub days: Vec<u8>,
    pub color: String,
    pub icon: String,
}

#[derive(serde::Serialize)]
struct SharePayload {
    schedules: Vec<ShareEntry>,
    timestamp: u64,
}

/// Loosely-shaped incoming entry; every field is checked explicitly before
/// anything is imported. Share tokens carry the category as `type`; backup
/// files carry full schedule records, so both spellings are accepted.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawShareEntry {
    #[serde(rename = "type", alias = "category", default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub days: Option<Vec<i64>>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(serde::Deserialize)]
struct RawSharePayload {
    #[serde(default)]
    schedules: Option<Vec<RawShareEntry>>,
}

/// A validated schedule-creation input, ready to merge under a fresh id.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleInput {
    pub category: WasteCategory,
    pub name: String,
    pub days: Vec<u8>,
    pub icon: String,
    pub color: String,
}

pub fn share_entries(schedules: &[Schedule]) -> Vec<ShareEntry> {
    schedules
        .iter()
        .map(|s| ShareEntry {
            category: s.category,
            name: s.name.clone(),
            days: s.days.clone(),
            color: s.color.clone(),
            icon: s.icon.clone(),
        })
        .collect()
}

/// Encodes schedules as one copy-pasteable token: JSON, then base64 over
/// the UTF-8 bytes. Going through bytes keeps multi-byte icon glyphs
/// intact inside the transform.
pub fn encode_token(schedules: &[Schedule], timestamp_ms: u64) -> Result<String, CliError> {
    let payload = SharePayload {
        schedules: share_entries(schedules),
        timestamp: timestamp_ms,
    };
    let bytes = serde_json::to_vec(&payload).map_err(|_| CliError::storage("DB IO error"))?;
    Ok(STANDARD.encode(bytes))
}

fn bytes_as_code_units(bytes: &[u8]) -> String {
    bytes.iter().map(|b| *b as char).collect()
}

fn parse_payload(text: &str) -> Result<Vec<ScheduleInput>, CliError> {
    let raw: RawSharePayload = serde_json::from_str(text)
        .map_err(|_| CliError::decode("Invalid or corrupted code"))?;
    let entries = raw
        .schedules
        .ok_or_else(|| CliError::decode("Invalid or corrupted code: missing schedules"))?;
    validate_entries(&entries, "code")
}

/// Decodes a share token. The byte-safe encoding (base64 over UTF-8 bytes)
/// is tried first; tokens from the old encoder mapped one code unit per
/// byte, so the raw bytes are re-read that way as a fallback. A token that
/// satisfies neither, or whose payload fails validation, imports nothing.
pub fn decode_token(token: &str) -> Result<Vec<ScheduleInput>, CliError> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|_| CliError::decode("Invalid or corrupted code"))?;

    if let Ok(text) = std::str::from_utf8(&bytes) {
        if let Ok(inputs) = parse_payload(text) {
            return Ok(inputs);
        }
    }

    parse_payload(&bytes_as_code_units(&bytes))
}

/// Checks every entry and reports all problems at once, never guessing at
/// missing fields. Non-custom entries may omit name/icon/color (category
/// defaults apply); `days` is always required.
pub fn validate_entries(
    entries: &[RawShareEntry],
    context: &str,
) -> Result<Vec<ScheduleInput>, CliError> {
    let mut inputs = Vec::new();
    let mut issues: Vec<String> = Vec::new();

    for (i, raw) in entries.iter().enumerate() {
        let n = i + 1;

        let category = match raw.category.as_deref() {
            None => {
                issues.push(format!("schedule {}: missing category", n));
                None
            }
            Some(c) => match WasteCategory::parse(c) {
                Some(cat) => Some(cat),
                None => {
                    issues.push(format!("schedule {}: unknown category '{}'", n, c));
                    None
                }
            },
        };

        let days: Option<Vec<u8>> = match raw.days.as_deref() {
            None => {
                issues.push(format!("schedule {}: missing days", n));
                None
            }
            Some([]) => {
                issues.push(format!("schedule {}: empty days", n));
                None
            }
            Some(ds) => {
                if ds.iter().any(|d| !(0..=6).contains(d)) {
                    issues.push(format!("schedule {}: weekday out of range", n));
                    None
                } else {
                    let mut out: Vec<u8> = ds.iter().map(|d| *d as u8).collect();
                    out.sort();
                    out.dedup();
                    Some(out)
                }
            }
        };

        let (category, days) = match (category, days) {
            (Some(c), Some(d)) => (c, d),
            _ => continue,
        };

        match make_schedule(
            String::new(),
            category,
            raw.name.as_deref(),
            days,
            raw.icon.as_deref(),
            raw.color.as_deref(),
            "",
        ) {
            Ok(s) => inputs.push(ScheduleInput {
                category: s.category,
                name: s.name,
                days: s.days,
                icon: s.icon,
                color: s.color,
            }),
            Err(e) => issues.push(format!("schedule {}: {}", n, e.message)),
        }
    }

    if !issues.is_empty() {
        return Err(CliError::decode(format!(
            "Invalid {}: {}",
            context,
            issues.join("; ")
        )));
    }

    Ok(inputs)
}

/// Merges validated inputs into the collection under fresh local ids.
pub fn merge_imported(db: &mut Db, inputs: Vec<ScheduleInput>, today: &str) -> Vec<Schedule> {
    let mut created = Vec::new();
    for input in inputs {
        let id = next_schedule_id(db);
        let schedule = Schedule {
            id,
            category: input.category,
            name: input.name,
            days: input.days,
            icon: input.icon,
            color: input.color,
            created_date: today.to_string(),
        };
        db.schedules.push(schedule.clone());
        created.push(schedule);
    }
    created
}

/// 6 characters, uppercase letters and digits, unique among stored codes.
pub fn generate_family_code(db: &Db, rng: &mut impl Rng) -> String {
    loop {
        let code: String = (0..FAMILY_CODE_LEN)
            .map(|_| FAMILY_CODE_ALPHABET[rng.gen_range(0..FAMILY_CODE_ALPHABET.len())] as char)
            .collect();
        if !db.share_codes.iter().any(|e| e.code == code) {
            return code;
        }
    }
}

pub fn looks_like_family_code(s: &str) -> bool {
    s.len() == FAMILY_CODE_LEN
        && s.bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

pub fn find_stored_token<'a>(db: &'a Db, code: &str) -> Option<&'a ShareCodeEntry> {
    db.share_codes.iter().find(|e| e.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::default_db;

    fn schedule(name: &str, icon: &str, days: Vec<u8>) -> Schedule {
        Schedule {
            id: "s0001".to_string(),
            category: WasteCategory::Organic,
            name: name.to_string(),
            days,
            icon: icon.to_string(),
            color: "green".to_string(),
            created_date: "2026-01-01".to_string(),
        }
    }

    #[test]
    fn roundtrip_preserves_multibyte_icons() {
        let schedules = vec![
            schedule("Organic", "🗑️", vec![1, 4]),
            schedule("Glass", "🫙", vec![6]),
        ];
        let token = encode_token(&schedules, 1_700_000_000_000).unwrap();
        let inputs = decode_token(&token).unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].name, "Organic");
        assert_eq!(inputs[0].icon, "🗑️");
        assert_eq!(inputs[0].days, vec![1, 4]);
        assert_eq!(inputs[1].icon, "🫙");
        assert_eq!(inputs[1].days, vec![6]);
    }

    #[test]
    fn legacy_ascii_token_decodes() {
        // Old encoder: base64 over one byte per code unit. For ASCII
        // payloads those bytes coincide with UTF-8.
        let json = r#"{"schedules":[{"type":"paper","name":"Paper","days":[3],"color":"yellow","icon":"P"}],"timestamp":1}"#;
        let token = STANDARD.encode(json.as_bytes());
        let inputs = decode_token(&token).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].category, WasteCategory::Paper);
        assert_eq!(inputs[0].days, vec![3]);
    }

    #[test]
    fn legacy_token_with_high_code_units_uses_fallback() {
        // "Carta è" encoded one byte per code unit (0xE8 for è) is not
        // valid UTF-8, so only the fallback path can read it.
        let json = "{\"schedules\":[{\"type\":\"paper\",\"name\":\"Carta \u{e8}\",\"days\":[3],\"color\":\"yellow\",\"icon\":\"P\"}],\"timestamp\":1}";
        let bytes: Vec<u8> = json.chars().map(|c| c as u32 as u8).collect();
        assert!(std::str::from_utf8(&bytes).is_err());

        let token = STANDARD.encode(&bytes);
        let inputs = decode_token(&token).unwrap();
        assert_eq!(inputs[0].name, "Carta è");
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(decode_token("not base64!!!").unwrap_err().exit_code, 5);
        // Valid base64, not JSON.
        let token = STANDARD.encode(b"hello world");
        assert_eq!(decode_token(&token).unwrap_err().exit_code, 5);
    }

    #[test]
    fn payload_without_schedules_is_rejected() {
        let token = STANDARD.encode(br#"{"timestamp":123}"#);
        let err = decode_token(&token).unwrap_err();
        assert_eq!(err.exit_code, 5);
        assert!(err.message.contains("schedules"));
    }

    #[test]
    fn malformed_entries_report_every_issue_and_import_nothing() {
        let json = r#"{"schedules":[
            {"type":"paper","days":[3]},
            {"type":"unknown","days":[2]},
            {"type":"plastic"},
            {"type":"organic","days":[9]}
        ]}"#;
        let token = STANDARD.encode(json.as_bytes());
        let err = decode_token(&token).unwrap_err();
        assert_eq!(err.exit_code, 5);
        assert!(err.message.contains("schedule 2"));
        assert!(err.message.contains("schedule 3"));
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn merge_assigns_fresh_ids() {
        let mut db = default_db();
        let inputs = vec![
            ScheduleInput {
                category: WasteCategory::Organic,
                name: "Organic".to_string(),
                days: vec![1],
                icon: "🗑️".to_string(),
                color: "green".to_string(),
            },
            ScheduleInput {
                category: WasteCategory::Paper,
                name: "Paper".to_string(),
                days: vec![3],
                icon: "📄".to_string(),
                color: "yellow".to_string(),
            },
        ];
        let created = merge_imported(&mut db, inputs, "2026-08-05");
        assert_eq!(created[0].id, "s0001");
        assert_eq!(created[1].id, "s0002");
        assert_eq!(db.meta.next_schedule_number, 3);
    }

    #[test]
    fn family_code_shape() {
        let db = default_db();
        let mut rng = rand::thread_rng();
        let code = generate_family_code(&db, &mut rng);
        assert!(looks_like_family_code(&code));
        assert!(!looks_like_family_code("abc123"));
        assert!(!looks_like_family_code("TOOLONG1"));
    }
}
