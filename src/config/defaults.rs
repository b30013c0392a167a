pub const DEFAULT_API_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com";

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub fn default_temperature() -> f32 {
    0.0
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_max_rounds() -> usize {
    5
}

pub fn default_follow_up() -> bool {
    false // One-shot dispatch unless asked for
}
