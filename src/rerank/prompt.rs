//! Rerank prompt construction

use crate::types::{Mode, Quote};

/// Persona for harsh mode: blunt, reality-first curation
const HARSH_PERSONA: &str =
    "너는 직설적이고 현실적인 쓴소리 큐레이터다. 각성/도전/강인함 톤의 문장을 우선한다.";

/// Persona for comfort mode: warm, empathetic curation
const COMFORT_PERSONA: &str =
    "너는 다정하고 공감적인 위로 큐레이터다. 위로/공감/희망/연대 톤의 문장을 우선한다.";

/// Build the rerank prompt: tone persona, 0-indexed candidate list, the raw
/// user input, and a JSON-only output instruction.
///
/// Random mode never reaches the reranker; any non-harsh mode gets the
/// comfort persona.
pub fn build_rerank_prompt(mode: Mode, input: &str, candidates: &[Quote]) -> String {
    let tone = if mode == Mode::Harsh {
        HARSH_PERSONA
    } else {
        COMFORT_PERSONA
    };

    let list = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. [{} / {}] {}", i, c.author, c.source, c.text))
        .collect::<Vec<_>>()
        .join("\n");

    [
        tone,
        "다음 후보 목록(0..N-1) 중 사용자 입력에 가장 어울리는 1개를 고른다.",
        "반드시 JSON으로만 답하라: { \"index\": <number>, \"reason\": \"...\" }",
        "",
        "--- 후보 ---",
        list.as_str(),
        "",
        "--- 입력 ---",
        input,
        "",
        "--- 출력 형식(JSON) ---",
        "{ \"index\": 0, \"reason\": \"간결한 이유\" }",
    ]
    .join("\n")
}
