//! Reader/writer stress over the shared context: many per-SYN checks
//! racing rare control-plane mutations must never panic, deadlock or
//! observe a torn key ring.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::thread;

use fastopen::cookie;
use fastopen::{ConnInfo, FastOpenContext, Key, Verdict};

const READERS: usize = 8;
const CHECKS_PER_READER: usize = 20_000;
const INSTALLS: usize = 1_000;

#[test]
fn concurrent_checks_and_installs() {
    let ctx = Arc::new(FastOpenContext::new());
    ctx.install_key(&[0x42; 16]).unwrap();

    let mut workers = Vec::new();

    for reader_no in 0..READERS {
        let ctx = Arc::clone(&ctx);
        workers.push(thread::spawn(move || {
            let conn = ConnInfo::new(IpAddr::V4(Ipv4Addr::new(
                198,
                51,
                100,
                reader_no as u8,
            )));
            let mut valid = 0usize;
            for i in 0..CHECKS_PER_READER {
                // Rotate through the three request shapes the TCP input
                // path produces: no cookie, garbage, current cookie.
                let (verdict, offer) = match i % 3 {
                    0 => ctx.check(&conn, None),
                    1 => ctx.check(&conn, Some(&[0xa5; 8])),
                    _ => {
                        let (_, current) = ctx.check(&conn, None);
                        ctx.check(&conn, Some(&*current))
                    }
                };
                match verdict {
                    Verdict::Valid => valid += 1,
                    // Keys are always resident in this test, so NoKeys
                    // would mean a torn ring was observed
                    Verdict::NoKeys => panic!("observed empty ring under stress"),
                    Verdict::NeedsCookie | Verdict::Invalid => {
                        assert_ne!(*offer, [0u8; 8], "offer missing despite resident keys");
                    }
                }
            }
            valid
        }));
    }

    let writer = {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || {
            for i in 0..INSTALLS {
                let mut material = [0u8; 16];
                material[..8].copy_from_slice(&(i as u64).to_le_bytes());
                material[8] = 0x42;
                ctx.install_key(&material).unwrap();
                assert!(ctx.num_keys() <= FastOpenContext::MAX_KEYS);
            }
        })
    };

    let mut total_valid = 0usize;
    for worker in workers {
        total_valid += worker.join().unwrap();
    }
    writer.join().unwrap();

    // Every reader re-derived the then-current cookie in a third of its
    // iterations; unless the writer happened to rotate twice between the
    // derive and the check, those validate. Requiring at least one keeps
    // the assertion robust while proving the valid path ran under load.
    assert!(total_valid > 0);

    // Quiesced: a freshly installed key behaves exactly like in the
    // single-threaded tests
    let conn = ConnInfo::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 77)));
    ctx.install_key(&[0x17; 16]).unwrap();
    let expected = cookie::derive(&Key::from_slice(&[0x17; 16]), &conn);
    let (verdict, latest) = ctx.check(&conn, Some(&*expected));
    assert_eq!(verdict, Verdict::Valid);
    assert_eq!(latest, expected);
}

#[test]
fn concurrent_enable_disable_cycles() {
    let ctx = Arc::new(FastOpenContext::new());
    ctx.set_autokey_interval(0).unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let conn = ConnInfo::new(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1)));
                for _ in 0..5_000 {
                    // Any verdict is fine while the ring flaps between
                    // cleared and repopulated; this is purely about
                    // memory safety and lock discipline.
                    let (verdict, _) = ctx.check(&conn, Some(&[0x5a; 8]));
                    assert!(matches!(
                        verdict,
                        Verdict::NoKeys | Verdict::NeedsCookie | Verdict::Invalid | Verdict::Valid
                    ));
                }
            })
        })
        .collect();

    for i in 0..50 {
        ctx.set_enabled(true);
        ctx.install_key(&[i as u8; 16]).unwrap();
        ctx.set_enabled(false);
        assert_eq!(ctx.num_keys(), 0);
    }

    for reader in readers {
        reader.join().unwrap();
    }
}
