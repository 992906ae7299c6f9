#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}",
                "error".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().red())),
                format_args!($fmt $($arg)*)
            );
        }
    };
    ($single:expr) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}",
                "error".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().red())),
                format_args!("{}", $single)
            );
        }
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            println!(
                "{}: {}",
                "info".if_supports_color(owo_colors::Stream::Stdout, |s| s
                        .style(owo_colors::Style::new().bold().green())),
                format_args!($($arg)*)
            );
        }
    }
}

#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}",
                "warning".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().yellow())),
                format_args!($fmt $($arg)*)
            );
        }
    };
    ($single:expr) => {
        {
            use owo_colors::OwoColorize;

            eprintln!(
                "{}: {}",
                "warning".if_supports_color(owo_colors::Stream::Stderr, |s| s
                        .style(owo_colors::Style::new().bold().yellow())),
                format_args!("{}", $single)
            );
        }
    };
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            if std::env::var("IRON_TRACE").is_ok() {
                println!(
                    "{}: {}",
                    "trace".if_supports_color(owo_colors::Stream::Stdout, |s| s
                            .style(owo_colors::Style::new().bold())),
                    format_args!($($arg)*)
                );
            }
        }
    }
}

/// Prints a whole line in green, prefixed with a check mark
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            println!(
                "{}",
                format!("✓ {}", format_args!($($arg)*))
                    .if_supports_color(owo_colors::Stream::Stdout, |s| s.green())
            );
        }
    }
}

/// Prints a follow-up instruction: a blue label and a plain suggestion
#[macro_export]
macro_rules! hint {
    ($label:expr, $($arg:tt)+) => {
        {
            use owo_colors::OwoColorize;

            println!(
                "{} {}",
                format!("→ {}", $label)
                    .if_supports_color(owo_colors::Stream::Stdout, |s| s.blue()),
                format_args!($($arg)*)
            );
        }
    }
}
