/*!
 * Tier Behavior Tests
 * The same guest binary meets different hosts
 */

use posix_shim::{Errno, Marshaller, Shim, SharedMemory, ShimConfig, Tier};
use std::sync::Arc;

fn shim_for(tier: Tier) -> (Shim, Marshaller) {
    let memory = Arc::new(SharedMemory::with_size(512));
    let marshal = Marshaller::new(Arc::clone(&memory) as Arc<dyn posix_shim::GuestMemory>);
    let shim = Shim::builder(memory).config(ShimConfig { tier }).build();
    (shim, marshal)
}

#[test]
fn test_sandboxed_tier_makes_session_mutation_fatal() {
    let (shim, _) = shim_for(Tier::Sandboxed);
    assert!(shim.call("setpgid", &[0, 0]).unwrap_err().is_not_implemented());
    assert!(shim.call("setsid", &[]).unwrap_err().is_not_implemented());
    assert!(shim.call("sethostname", &[0, 4]).unwrap_err().is_not_implemented());
    assert!(shim.call("alarm", &[10]).unwrap_err().is_not_implemented());
}

#[test]
fn test_sandboxed_tier_priority_calls_are_noops() {
    let (shim, _) = shim_for(Tier::Sandboxed);
    assert_eq!(shim.call("nice", &[10]).unwrap(), 0);
    assert_eq!(shim.call("getpriority", &[0, 0]).unwrap(), 0);
    assert_eq!(shim.call("setpriority", &[0, 0, 5]).unwrap(), 0);
}

#[test]
fn test_sandboxed_tier_getresuid_is_fatal_without_writes() {
    let (shim, marshal) = shim_for(Tier::Sandboxed);
    assert!(shim.call("getresuid", &[0, 4, 8]).unwrap_err().is_not_implemented());
    assert_eq!(marshal.read_u32(0).unwrap(), 0);
    assert_eq!(marshal.read_u32(4).unwrap(), 0);
    assert_eq!(marshal.read_u32(8).unwrap(), 0);
}

#[cfg(unix)]
mod worker {
    use super::*;

    #[test]
    fn test_worker_tier_identity_reads_are_real() {
        let (shim, _) = shim_for(Tier::Worker);
        // a real host answers; pid 1 would mean the default leaked through
        let pid = shim.call("getpid", &[]).unwrap();
        assert_eq!(pid, std::process::id() as i32);
    }

    #[test]
    fn test_worker_tier_blocks_privilege_transitions() {
        let (shim, _) = shim_for(Tier::Worker);
        for (name, args) in [
            ("seteuid", vec![0]),
            ("setegid", vec![0]),
            ("setgid", vec![0]),
            ("setreuid", vec![0, 0]),
            ("setregid", vec![0, 0]),
            ("setresuid", vec![0, 0, 0]),
            ("setresgid", vec![0, 0, 0]),
            ("execve", vec![0, 0, 0]),
        ] {
            let fault = shim.call(name, &args).unwrap_err();
            assert!(fault.is_not_implemented(), "{} must be absent in a worker", name);
        }
    }

    #[test]
    fn test_worker_tier_keeps_process_group_reads() {
        let (shim, _) = shim_for(Tier::Worker);
        assert!(shim.call("getpgrp", &[]).unwrap() > 0);
        let pid = shim.call("getpid", &[]).unwrap();
        assert!(shim.call("getpgid", &[pid]).unwrap() > 0);
    }
}

#[cfg(unix)]
mod native {
    use super::*;

    #[test]
    fn test_native_identity_matches_the_host() {
        let (shim, _) = shim_for(Tier::Native);
        assert_eq!(shim.call("getpid", &[]).unwrap(), std::process::id() as i32);
        let uid = shim.call("getuid", &[]).unwrap();
        let euid = shim.call("geteuid", &[]).unwrap();
        assert!(uid >= 0 && euid >= 0);
    }

    #[test]
    fn test_native_gethostname_round_trips() {
        let (shim, marshal) = shim_for(Tier::Native);
        assert_eq!(shim.call("gethostname", &[32, 64]).unwrap(), 0);
        let name = marshal.read_string(32).unwrap();
        assert!(!name.is_empty());
    }

    #[test]
    fn test_native_sethostname_needs_privilege() {
        let (shim, marshal) = shim_for(Tier::Native);
        // re-assert the current name so a privileged run changes nothing
        assert_eq!(shim.call("gethostname", &[64, 128]).unwrap(), 0);
        let current = marshal.read_string(64).unwrap();
        marshal.write_string(&current, 0, 64).unwrap();
        let ret = shim.call("sethostname", &[0, current.len() as i32]).unwrap();
        // 0 only when running privileged; EPERM otherwise
        assert!(ret == 0 || ret == Errno::EPERM.ret(), "ret={}", ret);
    }

    #[test]
    fn test_native_no_change_setreuid_succeeds() {
        let (shim, _) = shim_for(Tier::Native);
        // (uid_t)-1 means keep both ids
        assert_eq!(shim.call("setreuid", &[-1, -1]).unwrap(), 0);
        assert_eq!(shim.call("setregid", &[-1, -1]).unwrap(), 0);
    }

    #[test]
    fn test_native_execve_failure_returns_errno() {
        let (shim, marshal) = shim_for(Tier::Native);
        marshal.write_string("/nonexistent/binary", 64, 32).unwrap();
        // empty argv and envp vectors
        marshal.write_u32(0, 0).unwrap();
        marshal.write_u32(8, 0).unwrap();
        assert_eq!(
            shim.call("execve", &[64, 0, 8]).unwrap(),
            Errno::ENOENT.ret()
        );
    }

    #[test]
    fn test_native_alarm_cancel_reports_zero_remaining() {
        let (shim, _) = shim_for(Tier::Native);
        assert_eq!(shim.call("alarm", &[0]).unwrap(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_native_getresuid_writes_the_triple() {
        let (shim, marshal) = shim_for(Tier::Native);
        assert_eq!(shim.call("getresuid", &[0, 4, 8]).unwrap(), 0);
        let uid = shim.call("getuid", &[]).unwrap() as u32;
        assert_eq!(marshal.read_u32(0).unwrap(), uid);
        // effective and saved match real for an unprivileged process
        assert_eq!(marshal.read_u32(4).unwrap(), uid);
        assert_eq!(marshal.read_u32(8).unwrap(), uid);
    }
}
