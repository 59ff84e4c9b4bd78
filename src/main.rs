// ==========================================
// 车险经营分析引擎 - 标准输入输出工作进程
// ==========================================
// 协议: stdin 每行一个请求 JSON, stdout 每行一个响应 JSON
// 日志: 输出到 stderr (KPI_ENGINE_LOG_FORMAT=json 输出 JSON 行)
// 语言: KPI_ENGINE_LOCALE=en 切换错误消息语言
// 参数: [配置目录] 指定时启动即进入 Configured 状态
// ==========================================

use anyhow::Context;
use insurance_kpi_engine::api::{
    EngineError, ErrorPayload, RequestEnvelope, Response, ResponseEnvelope,
};
use insurance_kpi_engine::app::{Dispatcher, EngineWorker};
use insurance_kpi_engine::config::{ConfigLoader, EngineConfig};
use insurance_kpi_engine::{i18n, logging, APP_NAME, VERSION};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    i18n::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    let dispatcher = match std::env::args().nth(1) {
        Some(dir) => {
            let payload = ConfigLoader::load_dir(&dir)
                .with_context(|| format!("无法加载配置目录: {}", dir))?;
            Dispatcher::with_config(EngineConfig::from_init(payload)?)
        }
        None => Dispatcher::new(),
    };

    let EngineWorker {
        requests,
        mut responses,
        thread,
    } = EngineWorker::spawn(dispatcher).context("无法启动引擎工作线程")?;
    tracing::info!("{}", i18n::t("common.ready"));

    // 解析失败的请求行直接回写,不进入引擎
    let (reject_tx, mut reject_rx) = mpsc::unbounded_channel::<ResponseEnvelope>();

    let writer = tokio::spawn(async move {
        let stdout = std::io::stdout();
        loop {
            let envelope = tokio::select! {
                Some(envelope) = responses.recv() => envelope,
                Some(envelope) = reject_rx.recv() => envelope,
                else => break,
            };
            let mut out = stdout.lock();
            if let Err(e) = write_frame(&mut out, &envelope) {
                tracing::error!("响应写出失败: {}", e);
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("读取标准输入失败")? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RequestEnvelope>(&line) {
            Ok(envelope) => {
                if requests.send(envelope).is_err() {
                    tracing::error!("引擎工作线程已退出");
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("无法解析请求: {}", e);
                let _ = reject_tx.send(malformed(&line, &e));
            }
        }
    }

    // stdin 关闭: 等待在途请求处理完毕
    drop(requests);
    drop(reject_tx);
    writer.await.context("响应写出任务异常退出")?;
    if thread.join().is_err() {
        tracing::error!("引擎工作线程异常退出");
    }

    tracing::info!("{} 退出", APP_NAME);
    Ok(())
}

fn write_frame<W: Write>(out: &mut W, envelope: &ResponseEnvelope) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, envelope)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// 尽量从原始请求中取回 id,便于调用方关联错误
fn malformed(line: &str, err: &serde_json::Error) -> ResponseEnvelope {
    let id = serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|value| value.get("id").and_then(serde_json::Value::as_u64));

    let err = EngineError::MalformedRequest(err.to_string());
    ResponseEnvelope::new(id, Response::Error(ErrorPayload::from(&err)))
}
