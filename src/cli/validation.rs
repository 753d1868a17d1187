use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.page_size == Some(0) {
        return Err("invalid page-size, expected positive integer".to_string());
    }
    if args.page == Some(0) {
        return Err("invalid page, expected positive integer".to_string());
    }
    if args.details == Some(0) {
        return Err("invalid details card, expected positive integer".to_string());
    }
    if args.columns == Some(0) {
        return Err("invalid columns, expected positive integer".to_string());
    }
    if args.rate == Some(0) {
        return Err("invalid rate, expected positive integer".to_string());
    }
    if args.concurrency == Some(0) {
        return Err("invalid concurrency, expected positive integer".to_string());
    }
    if args.workers == Some(0) {
        return Err("invalid workers, expected positive integer".to_string());
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text or json"
            ));
        }
    }
    if let Some(term) = args.search.as_deref() {
        if term.trim().is_empty() {
            return Err("invalid --search, expected a name".to_string());
        }
        if args.page.is_some() {
            return Err("use either --search or --page, not both".to_string());
        }
    }
    Ok(())
}
