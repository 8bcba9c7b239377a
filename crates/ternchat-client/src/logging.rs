use colored::Colorize;
use ternchat_models::ChatRequest;

const MAX_BODY_CHARS: usize = 5000;

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

fn redact_key(api_key: &str) -> String {
    if api_key.is_empty() {
        "(none)".to_string()
    } else {
        format!("{}***", api_key.chars().take(8).collect::<String>())
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, request: &ChatRequest, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!(
        "{} {}",
        "HTTP REQUEST".bright_cyan().bold(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!("{}: {}", "URL".bright_yellow(), url);
    println!("{}: Bearer {}", "Authorization".bright_yellow(), redact_key(api_key));

    match serde_json::to_string_pretty(request) {
        Ok(json) => println!("{}", safe_truncate(&json, MAX_BODY_CHARS)),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }
    println!("{}", "═".repeat(80).bright_cyan());
}

/// Log an error response body
pub fn log_response(status: reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }
    println!(
        "{} {} {}",
        "HTTP RESPONSE".bright_red().bold(),
        status.to_string().bright_yellow(),
        safe_truncate(body, MAX_BODY_CHARS).bright_black()
    );
}

/// Log one raw chunk of a streaming response body in verbose mode
pub fn log_stream_chunk(chunk_number: usize, data: &str, verbose: bool) {
    if !verbose {
        return;
    }
    println!(
        "{} {}",
        format!("chunk {:>4}", chunk_number).bright_black(),
        safe_truncate(data, 200).bright_black()
    );
}
