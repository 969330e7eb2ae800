use super::types::TestEvent;

pub fn encode_event_jsonl_line(event: &TestEvent) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    Ok(line)
}

pub fn parse_event_jsonl_line(line: &str) -> serde_json::Result<TestEvent> {
    serde_json::from_str::<TestEvent>(line.trim_end())
}
