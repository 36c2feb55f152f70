use clap::Parser;

/// Download one or more files over HTTP at the same time.
///
/// Each file is saved in the current directory under the last path
/// segment of its URL. Progress for every file is shown on a single line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URLs to download. Repeated URLs are fetched once.
    #[arg(value_name = "URL", required = true, num_args = 1..)]
    pub urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_urls() {
        let args =
            Args::try_parse_from(["multiget", "http://a/1.bin", "http://b/2.bin"]).unwrap();
        assert_eq!(args.urls, ["http://a/1.bin", "http://b/2.bin"]);
    }

    #[test]
    fn requires_a_url() {
        assert!(Args::try_parse_from(["multiget"]).is_err());
    }

    #[test]
    fn has_no_flags() {
        assert!(Args::try_parse_from(["multiget", "--threads", "4", "http://a/1.bin"]).is_err());
    }
}
