/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 podkeys contributors
 */

use std::fmt;
use std::io;
use std::mem;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::str::FromStr;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::io::unix::AsyncFd;

use podkeys_client::ProximityChannel;

/// MTU expected on the proximity key service channel.
const L2CAP_MTU: usize = 2048;

// bluetooth socket types libc does not wrap
const BTPROTO_L2CAP: libc::c_int = 0;
const BDADDR_BREDR: u8 = 0x00;

#[allow(non_camel_case_types)]
#[repr(C)]
struct sockaddr_l2 {
    l2_family: libc::sa_family_t,
    l2_psm: u16,
    l2_bdaddr: [u8; 6],
    l2_cid: u16,
    l2_bdaddr_type: u8,
}

/// Bluetooth device address, stored in the kernel's byte order, which is
/// the reverse of the printed form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BdAddr([u8; 6]);

impl FromStr for BdAddr {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');
        for i in (0..6).rev() {
            let part = parts
                .next()
                .ok_or_else(|| anyhow!("invalid bluetooth address {s}"))?;
            if part.len() != 2 {
                return Err(anyhow!("invalid bluetooth address {s}"));
            }
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| anyhow!("invalid bluetooth address {s}"))?;
        }
        if parts.next().is_some() {
            return Err(anyhow!("invalid bluetooth address {s}"));
        }
        Ok(BdAddr(bytes))
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

pub(crate) struct L2capChannel {
    fd: AsyncFd<OwnedFd>,
}

impl L2capChannel {
    /// Open a seqpacket L2CAP channel to the given peer and PSM. Link
    /// authentication and encryption are the kernel's job on connect.
    pub(crate) async fn connect(peer: BdAddr, psm: u16) -> io::Result<Self> {
        let fd = tokio::task::spawn_blocking(move || blocking_connect(peer, psm))
            .await
            .map_err(|e| io::Error::other(format!("connect task failed: {e}")))??;
        set_nonblocking(&fd)?;
        Ok(L2capChannel {
            fd: AsyncFd::new(fd)?,
        })
    }
}

fn blocking_connect(peer: BdAddr, psm: u16) -> io::Result<OwnedFd> {
    let fd = unsafe {
        libc::socket(
            libc::AF_BLUETOOTH,
            libc::SOCK_SEQPACKET | libc::SOCK_CLOEXEC,
            BTPROTO_L2CAP,
        )
    };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    let fd = unsafe { OwnedFd::from_raw_fd(fd) };

    let mut addr: sockaddr_l2 = unsafe { mem::zeroed() };
    addr.l2_family = libc::AF_BLUETOOTH as libc::sa_family_t;
    addr.l2_psm = psm.to_le();
    addr.l2_bdaddr = peer.0;
    addr.l2_bdaddr_type = BDADDR_BREDR;

    let ret = unsafe {
        libc::connect(
            fd.as_raw_fd(),
            &addr as *const sockaddr_l2 as *const libc::sockaddr,
            mem::size_of::<sockaddr_l2>() as libc::socklen_t,
        )
    };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(fd)
}

fn set_nonblocking(fd: &OwnedFd) -> io::Result<()> {
    unsafe {
        let flags = libc::fcntl(fd.as_raw_fd(), libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd.as_raw_fd(), libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[async_trait]
impl ProximityChannel for L2capChannel {
    type Error = io::Error;

    async fn send_pdu(&mut self, pdu: &[u8]) -> io::Result<()> {
        loop {
            let mut guard = self.fd.writable().await?;
            match guard.try_io(|fd| {
                let nw = unsafe { libc::send(fd.as_raw_fd(), pdu.as_ptr().cast(), pdu.len(), 0) };
                if nw < 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(nw as usize)
                }
            }) {
                Ok(Ok(nw)) => {
                    // seqpacket writes are all or nothing
                    return if nw == pdu.len() {
                        Ok(())
                    } else {
                        Err(io::Error::other("partial send on seqpacket socket"))
                    };
                }
                Ok(Err(e)) => return Err(e),
                Err(_would_block) => continue,
            }
        }
    }

    async fn recv_pdu(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = [0u8; L2CAP_MTU];
        loop {
            let mut guard = self.fd.readable().await?;
            match guard.try_io(|fd| {
                let nr =
                    unsafe { libc::recv(fd.as_raw_fd(), buf.as_mut_ptr().cast(), buf.len(), 0) };
                if nr < 0 {
                    Err(io::Error::last_os_error())
                } else {
                    Ok(nr as usize)
                }
            }) {
                Ok(Ok(0)) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed by peer",
                    ));
                }
                Ok(Ok(nr)) => return Ok(buf[..nr].to_vec()),
                Ok(Err(e)) => return Err(e),
                Err(_would_block) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bdaddr_parse_reverses_bytes() {
        let addr = BdAddr::from_str("00:11:22:AA:BB:CC").unwrap();
        assert_eq!(addr.0, [0xCC, 0xBB, 0xAA, 0x22, 0x11, 0x00]);
    }

    #[test]
    fn bdaddr_display_round_trip() {
        let addr = BdAddr::from_str("a0:b1:c2:d3:e4:f5").unwrap();
        assert_eq!(addr.to_string(), "A0:B1:C2:D3:E4:F5");
    }

    #[test]
    fn bdaddr_rejects_malformed() {
        assert!(BdAddr::from_str("").is_err());
        assert!(BdAddr::from_str("00:11:22:AA:BB").is_err());
        assert!(BdAddr::from_str("00:11:22:AA:BB:CC:DD").is_err());
        assert!(BdAddr::from_str("00:11:22:AA:BB:GG").is_err());
        assert!(BdAddr::from_str("001:1:22:AA:BB:CC").is_err());
    }
}
