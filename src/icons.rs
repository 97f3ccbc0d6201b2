use maud::PreEscaped;

type HTML = PreEscaped<&'static str>;

pub fn search() -> HTML {
    PreEscaped(
        r#"<svg class="h-5 w-5" fill="none" stroke="currentColor" stroke-width="2" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <circle cx="11" cy="11" r="7" />
            <path d="M20 20L16.65 16.65" stroke-linecap="round" />
        </svg>"#,
    )
}

pub fn error() -> HTML {
    PreEscaped(
        r#"<svg class="h-5 w-5" fill="none" stroke="currentColor" stroke-width="2" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
            <circle cx="12" cy="12" r="9" />
            <path d="M12 7.5V12.5M12 16.5H12.01" stroke-linecap="round" />
        </svg>"#,
    )
}
