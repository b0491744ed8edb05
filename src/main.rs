//! vextract - VALUE EXTRACTOR
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process;
use tracing::debug;

use vextract::{
    cli::Args,
    coordinator::ExtractionCoordinator,
    request::ExtractionRequest,
    run::{failure_text, run_extraction, RunOutcome},
    status::{emit, Reporter, StatusLevel, StatusMessage},
};

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("{} {:#}", "오류:".bright_red(), error);
            process::exit(1);
        }
    }
}

/// 실행 후 성공 여부 반환 (값이 없는 경우도 성공)
fn run(args: &Args) -> Result<bool> {
    setup_logging(args)?;

    let reporter = ConsoleReporter::new();

    // 입력 검사
    let request = match args.to_request() {
        Ok(request) => request,
        Err(e) => {
            emit(&reporter, StatusLevel::Error, failure_text(&e));
            return Ok(false);
        }
    };
    let output = args.get_output(&request);

    if !args.quiet {
        print_header(args, &request, &output);
    }

    let coordinator = ExtractionCoordinator::new().with_mmap_threshold(args.mmap_threshold);
    let result = run_extraction(
        &coordinator,
        request,
        &args.input,
        &output,
        &reporter,
        |stats| reporter.tick(stats.get_lines_read(), stats.get_values_matched()),
    );
    reporter.finish();

    let summary = match result {
        Ok(summary) => summary,
        // 종료 메시지는 이미 출력됨
        Err(e) => {
            debug!(error = %e, "run failed");
            return Ok(false);
        }
    };

    if !args.quiet {
        summary.stats.print_summary();
        match summary.outcome {
            RunOutcome::Written { output, .. } => {
                println!("\n{} 저장 완료: {:?}\n", "✅".bright_green(), output);
            }
            RunOutcome::NoMatches { count } if count > 0 => {
                println!(
                    "\n{} 일치한 값 {}개가 모두 범위 밖입니다.\n",
                    "⚠️".bright_yellow(),
                    count.to_string().yellow()
                );
            }
            RunOutcome::NoMatches { .. } => {
                println!("\n{} 출력 파일을 만들지 않았습니다.\n", "⚠️".bright_yellow());
            }
        }
    }

    Ok(true)
}

/// 구조화 로깅 설정
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vextract={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("로깅 초기화 실패")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args, request: &ExtractionRequest, output: &Path) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 VALUE EXTRACTOR".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 파일: {:?}", "📂".bright_cyan(), args.input);
    println!("  {} 출력 파일: {:?}", "📄".bright_green(), output);
    println!("  {} 모드: {}", "⚙️".bright_yellow(), request.mode());
    println!("  {} 구분자: {}", "🔗".bright_magenta(), request.delimiter());
    println!("  {} 소수점: {}", "🔢".bright_cyan(), request.decimal());

    if args.start.is_some() || args.stop.is_some() {
        println!("  {} 범위: {}", "📏".bright_white(), request.range());
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 스피너와 함께 상태 메시지를 터미널에 출력하는 리포터
struct ConsoleReporter {
    spinner: ProgressBar,
}

impl ConsoleReporter {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { spinner }
    }

    /// 폴링 한 번마다 호출
    fn tick(&self, lines: u64, matched: u64) {
        self.spinner
            .set_message(format!("{} 줄 읽음, {} 값 일치", lines, matched));
        self.spinner.tick();
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, message: StatusMessage) {
        let text = match message.level {
            StatusLevel::Progress => message.to_string().bright_cyan(),
            StatusLevel::Finished => message.to_string().bright_green(),
            StatusLevel::NoValues => message.to_string().yellow(),
            StatusLevel::Error => message.to_string().bright_red(),
        };
        self.spinner.suspend(|| println!("{}", text));
    }
}
