// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Appended to prompts whose output is machine-parsed.
pub const IDS_ONLY_INSTRUCTION: &str =
    "설명 없이 선택한 키워드의 ID만 JSON 배열 형식으로 반환해주세요.";

/// Tone guidance for any text shown to employers.
pub const POLITE_KOREAN_TONE: &str =
    "정중하고 자연스러운 한국어 존댓말(합니다체)을 사용하세요.";

/// Substitutes `{name}` placeholders in one left-to-right pass.
///
/// Inserted values are never rescanned, so braces inside user text stay literal.
/// Unknown placeholders are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
