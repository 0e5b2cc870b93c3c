use std::io;
use std::time::Duration;

use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use tracing::debug;

use mnat_common::error::ScanError;

/// How long a blocking read waits before the collection loop re-checks its deadline.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

pub struct EthernetHandle {
    pub tx: Box<dyn DataLinkSender>,
    pub rx: Box<dyn DataLinkReceiver>,
}

/// Opens a raw Layer 2 channel on `intf`.
///
/// Requires root or `CAP_NET_RAW` on Linux; a refusal from the OS is reported
/// as [`ScanError::Permission`].
pub fn open(intf: &NetworkInterface) -> Result<EthernetHandle, ScanError> {
    open_eth_channel(intf, &get_config(), datalink::channel)
}

fn open_eth_channel<F>(intf: &NetworkInterface, cfg: &Config, channel_opener: F) -> Result<EthernetHandle, ScanError>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    match channel_opener(intf, *cfg) {
        Ok(Channel::Ethernet(tx, rx)) => {
            debug!("Datalink channel opened on {}", intf.name);
            Ok(EthernetHandle { tx, rx })
        }
        Ok(_) => Err(ScanError::Transport(format!("non-ethernet channel for {}", intf.name))),
        Err(source) if source.kind() == io::ErrorKind::PermissionDenied => Err(ScanError::Permission {
            interface: intf.name.clone(),
            source,
        }),
        Err(e) => Err(ScanError::Transport(format!("opening on {}: {e}", intf.name))),
    }
}

fn get_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
