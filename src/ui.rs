// src/ui.rs

use crate::{config::AppConfig, constants, symbols};
use colored::*;
use std::net::SocketAddr;

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

/// 启动横幅：监听地址与解析服务顺序
pub fn print_banner(config: &AppConfig, addr: SocketAddr) {
    let address = format!("地址: http://{}", addr);
    let services = format!(
        "解析服务: {}",
        config
            .services
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    let hosts = format!("允许的站点: {}", config.allowed_hosts.join(", "));
    let hint = format!("按 {} 停止服务", *symbols::CTRL_C);

    box_message(
        &format!("{} v{}", clap::crate_name!(), clap::crate_version!()),
        &[address.as_str(), services.as_str(), hosts.as_str(), hint.as_str()],
        |s| s.cyan(),
    );
}
