const MAX_TICKER_LEN: usize = 20;

/// Normalizes user input into a symbol the backend understands, e.g. ` brk.b ` -> `BRK.B`.
pub fn sanitize_ticker(ticker: &str) -> String {
    ticker
        .trim()
        .chars()
        .take(MAX_TICKER_LEN)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_ticker_pass_no_harm() {
        assert_eq!(sanitize_ticker("AAPL"), "AAPL");
    }

    #[test]
    fn sanitize_ticker_pass_to_uppercase() {
        assert_eq!(sanitize_ticker("msft"), "MSFT");
    }

    #[test]
    fn sanitize_ticker_pass_trim() {
        assert_eq!(sanitize_ticker("  nvda \n"), "NVDA");
    }

    #[test]
    fn sanitize_ticker_pass_delimiters() {
        assert_eq!(sanitize_ticker("brk.b"), "BRK.B");
        assert_eq!(sanitize_ticker("^gspc"), "^GSPC");
        assert_eq!(sanitize_ticker("eurusd=x"), "EURUSD=X");
    }

    #[test]
    fn sanitize_ticker_pass_remove_other() {
        assert_eq!(sanitize_ticker("AA*&(PL/ ;"), "AAPL");
    }

    #[test]
    fn sanitize_ticker_pass_max_len() {
        assert_eq!(
            sanitize_ticker("123123123123123123123"),
            "12312312312312312312"
        );
    }

    #[test]
    fn sanitize_ticker_pass_blank() {
        assert_eq!(sanitize_ticker("   "), "");
    }
}
