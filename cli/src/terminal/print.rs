use std::path::Path;
use std::time::Duration;

use colored::*;
use mnat_common::network::device::Device;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

const IP_WIDTH: usize = 15;
const MAC_WIDTH: usize = 17;

const BANNER: &str = r#"
              __  __ _   _    _  _____
             |  \/  | \ | |  / \|_   _|
             | |\/| |  \| | / _ \ | |
             | |  | | |\  |/ ___ \| |
             |_|  |_|_| \_/_/   \_\_|
"#;

const NO_RESULTS: &str = r#"
         _   _  ___    ____  _______     _____ ____ _____ ____
        | \ | |/ _ \  |  _ \| ____\ \   / /_ _/ ___| ____/ ___|
        |  \| | | | | | | | |  _|  \ \ / / | | |   |  _| \___ \
        | |\  | |_| | | |_| | |___  \ V /  | | |___| |___ ___) |
        |_| \_|\___/  |____/|_____|  \_/  |___\____|_____|____/
"#;

pub fn print(msg: &str) {
    println!("{msg}");
}

pub fn banner() {
    let text_content: String = format!("⟦ MNAT v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();

    print(&format!("{}", BANNER.color(colors::PRIMARY).bold()));
    print(&format!("{sep}{text}{sep}"));
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    print(&format!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.bright_green(),
        "─".repeat(right).bright_black()
    ));
}

pub fn fat_separator() {
    print(&format!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));
}

/// `plain` is measured, `styled` is printed; ANSI escapes have no width.
pub fn centerln(plain: &str, styled: &str) {
    let space: String = " ".repeat(TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(plain)) / 2);
    print(&format!("{space}{styled}"));
}

/// Prints devices in the order given, one row each.
pub fn device_table(devices: &[Device]) {
    print(&format!(
        "{} {} {}",
        format!("{:<IP_WIDTH$}", "IP").color(colors::ACCENT).bold(),
        format!("{:<MAC_WIDTH$}", "MAC").color(colors::ACCENT).bold(),
        "Hostname".color(colors::ACCENT).bold(),
    ));
    print(&format!("{}", "─".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));

    for device in devices {
        print(&device_row(device));
    }
}

fn device_row(device: &Device) -> String {
    let hostname: ColoredString = if device.hostname.is_resolved() {
        device.hostname.as_str().color(colors::HOSTNAME)
    } else {
        device.hostname.as_str().color(colors::UNRESOLVED).italic()
    };

    format!(
        "{} {} {}",
        format!("{:<IP_WIDTH$}", device.ip.to_string()).color(colors::IPV4_ADDR),
        format!("{:<MAC_WIDTH$}", device.mac.to_string()).color(colors::MAC_ADDR),
        hostname
    )
}

pub fn summary(count: usize, elapsed: Duration) {
    let noun: &str = if count == 1 { "device" } else { "devices" };
    let devices: String = format!("{count} {noun}");
    let seconds: String = format!("{:.2}s", elapsed.as_secs_f64());
    let plain: String = format!("Scan Complete: {devices} identified in {seconds}");
    let styled: String = format!(
        "{} {} {} {}",
        "Scan Complete:".color(colors::TEXT_DEFAULT),
        devices.bold().green(),
        "identified in".color(colors::TEXT_DEFAULT),
        seconds.bold().yellow()
    );

    fat_separator();
    centerln(&plain, &styled);
}

pub fn saved_to(path: &Path) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!(
        "{} {} {}",
        prefix,
        "Results saved to".color(colors::TEXT_DEFAULT),
        path.display().to_string().color(colors::PRIMARY)
    ));
}

pub fn no_results() {
    print(&format!("{}", NO_RESULTS.red().bold()));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use mnat_common::network::device::Hostname;
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;

    #[test]
    fn row_contains_all_columns() {
        colored::control::set_override(false);
        let device = Device::new(Ipv4Addr::new(192, 168, 1, 10), MacAddr::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff))
            .with_hostname(Hostname::Resolved("printer.lan".into()));

        let row: String = device_row(&device);

        assert_eq!(row, "192.168.1.10    aa:bb:cc:dd:ee:ff printer.lan");
    }

    #[test]
    fn unresolved_row_shows_sentinel() {
        colored::control::set_override(false);
        let device = Device::new(Ipv4Addr::new(10, 0, 0, 1), MacAddr::zero());

        assert!(device_row(&device).ends_with(" unresolved"));
    }
}
