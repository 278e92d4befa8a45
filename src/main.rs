use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use text_anomaly_detection::server;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        eprintln!("[PANIC] 程序异常退出");
        eprintln!("位置: {}", location);
        eprintln!("原因: {}", message);
        eprintln!(
            "时间: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );

        tracing::error!(event = "panic.raised", location = %location, reason = %message);
        std::io::stderr().flush().ok();
    }));

    let mut args = std::env::args();
    let _ = args.next();

    match args.next().as_deref() {
        Some("invoke") | Some("--invoke") => {
            let Some(event_path) = args.next() else {
                eprintln!("用法: text-anomaly-detection invoke <event.json>");
                return Ok(ExitCode::from(2));
            };
            let succeeded = server::invoke_once(&PathBuf::from(event_path)).await?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some("check-config") | Some("--check-config") => {
            let report = server::check_config()?;
            for issue in &report.errors {
                println!("[error] {}: {}", issue.field, issue.message);
            }
            for issue in &report.warnings {
                println!("[warn] {}: {}", issue.field, issue.message);
            }
            for issue in &report.info {
                println!("[info] {}: {}", issue.field, issue.message);
            }
            println!(
                "配置检查: errors={}, warnings={}",
                report.error_count(),
                report.warning_count()
            );
            Ok(if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some("serve") | Some("--serve") | None => {
            server::start_server().await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(other) => {
            eprintln!("未知命令: {}", other);
            eprintln!("可用命令: serve | invoke <event.json> | check-config");
            Ok(ExitCode::from(2))
        }
    }
}
