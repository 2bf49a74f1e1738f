use std::{collections::BTreeSet, path::Path};

use super::result::CaseId;

/// Ids of every `<input_prefix><digits>.<file_suffix>` file directly under `dir`, ascending and
/// without duplicates (`input7.txt` and `input007.txt` are both case 7).
///
/// Other entries are skipped silently. The caller is expected to have checked that `dir` is a
/// directory; an empty result is not an error.
pub fn list_cases(
    dir: impl AsRef<Path>,
    input_prefix: &str,
    file_suffix: &str,
) -> fsutil::Result<Vec<CaseId>> {
    let mut ids = BTreeSet::new();
    for entry in fsutil::read_dir(&dir)?.filter_map(Result::ok) {
        let Ok(ft) = entry.file_type() else {
            continue
        };
        if ft.is_dir() {
            continue;
        }
        let filename = entry.file_name();
        let Some(filename) = filename.to_str() else {
            continue
        };
        match parse_case_id(filename, input_prefix, file_suffix) {
            Some(id) => {
                ids.insert(id);
            }
            None => log::debug!("Not a testcase input: {}", filename),
        }
    }
    Ok(ids.into_iter().collect())
}

pub fn parse_case_id(filename: &str, input_prefix: &str, file_suffix: &str) -> Option<CaseId> {
    let digits = filename
        .strip_prefix(input_prefix)?
        .strip_suffix(file_suffix)?
        .strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(CaseId)
}
