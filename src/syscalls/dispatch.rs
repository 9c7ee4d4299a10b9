/*!
 * Syscall Dispatch Table
 * One entry per POSIX call name, policy carried as data
 *
 * Built once at shim initialization; every entry closes (through the
 * executor) over the marshaller, the capability set, and the descriptor
 * table. Handlers receive the guest's raw integer arguments and return the
 * single integer the guest sees, or a fatal fault.
 */

use super::executor::SyscallExecutor;
use super::policy::Policy;
use super::types::{CallFault, CallResult};
use crate::core::GuestPtr;
use crate::monitoring::span_call;
use ahash::AHashMap;
use log::{trace, warn};
use std::sync::Arc;

type Handler = fn(&SyscallExecutor, &[i32]) -> CallResult;

/// One dispatch-table entry.
pub struct CallSpec {
    pub name: &'static str,
    pub policy: Policy,
    pub arity: usize,
    handler: Option<Handler>,
}

impl CallSpec {
    fn handled(name: &'static str, policy: Policy, arity: usize, handler: Handler) -> Self {
        Self { name, policy, arity, handler: Some(handler) }
    }

    /// An entry that fails with the fatal not-implemented outcome on every
    /// tier. No handler body exists on purpose.
    fn unsupported(name: &'static str, arity: usize) -> Self {
        Self { name, policy: Policy::PermanentlyUnsupported, arity, handler: None }
    }
}

/// The unistd-domain call table.
pub struct SyscallTable {
    executor: Arc<SyscallExecutor>,
    entries: AHashMap<&'static str, CallSpec>,
}

impl SyscallTable {
    /// Build the table over an executor. Infallible and cheap; do it once
    /// per sandbox context.
    #[must_use]
    pub fn unistd(executor: Arc<SyscallExecutor>) -> Self {
        let mut entries = AHashMap::with_capacity(64);
        for spec in unistd_specs() {
            entries.insert(spec.name, spec);
        }
        Self { executor, entries }
    }

    /// Look a call up by name and run it against the guest's raw argument
    /// vector.
    pub fn dispatch(&self, name: &str, args: &[i32]) -> CallResult {
        let span = span_call(name);
        let _guard = span.enter();

        let Some(spec) = self.entries.get(name) else {
            span.record_error("unknown syscall");
            return Err(CallFault::Unknown { call: name.to_string() });
        };
        if args.len() != spec.arity {
            span.record_error("bad arity");
            return Err(CallFault::BadArity {
                call: name.to_string(),
                expected: spec.arity,
                got: args.len(),
            });
        }
        if spec.policy == Policy::PermanentlyUnsupported {
            warn!("{}: permanently unsupported on this runtime", name);
            span.record_error("permanently unsupported");
            return Err(CallFault::not_implemented(name));
        }

        // every non-unsupported entry carries a handler by construction
        let Some(handler) = spec.handler else {
            span.record_error("no handler");
            return Err(CallFault::not_implemented(name));
        };
        let result = handler(&self.executor, args);
        match &result {
            Ok(ret) => {
                trace!("{} -> {}", name, ret);
                span.record_ret(*ret);
            }
            Err(fault) => {
                warn!("{} aborted: {}", name, fault);
                span.record_error(&fault.to_string());
            }
        }
        result
    }

    /// Whether the domain defines `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The per-call policy, for auditing the table as a table.
    #[must_use]
    pub fn policy(&self, name: &str) -> Option<Policy> {
        self.entries.get(name).map(|spec| spec.policy)
    }

    /// Every call name with its policy.
    pub fn calls(&self) -> impl Iterator<Item = (&'static str, Policy)> + '_ {
        self.entries.values().map(|spec| (spec.name, spec.policy))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The executor the table closes over.
    #[must_use]
    pub fn executor(&self) -> &Arc<SyscallExecutor> {
        &self.executor
    }
}

#[inline]
fn ptr(arg: i32) -> GuestPtr {
    arg as GuestPtr
}

fn unistd_specs() -> Vec<CallSpec> {
    use Policy::*;
    vec![
        // ownership and durability
        CallSpec::handled("chown", NoopWithoutCapability, 3, |x, a| {
            x.chown(ptr(a[0]), a[1] as u32, a[2] as u32)
        }),
        CallSpec::handled("lchown", NoopWithoutCapability, 3, |x, a| {
            x.lchown(ptr(a[0]), a[1] as u32, a[2] as u32)
        }),
        CallSpec::handled("fchown", NoopWithoutCapability, 3, |x, a| {
            x.fchown(a[0], a[1] as u32, a[2] as u32)
        }),
        CallSpec::handled("sync", NoopWithoutCapability, 0, |x, _| x.sync()),
        // identity queries
        CallSpec::handled("getuid", BenignDefault, 0, |x, _| x.getuid()),
        CallSpec::handled("getgid", BenignDefault, 0, |x, _| x.getgid()),
        CallSpec::handled("geteuid", BenignDefault, 0, |x, _| x.geteuid()),
        CallSpec::handled("getegid", BenignDefault, 0, |x, _| x.getegid()),
        CallSpec::handled("getgroups", BenignDefault, 2, |x, a| {
            x.getgroups(a[0], ptr(a[1]))
        }),
        CallSpec::handled("getpid", BenignDefault, 0, |x, _| x.getpid()),
        CallSpec::handled("getppid", BenignDefault, 0, |x, _| x.getppid()),
        // process groups and sessions
        CallSpec::handled("getpgid", BenignDefault, 1, |x, a| x.getpgid(a[0])),
        CallSpec::handled("setpgid", RequireCapability, 2, |x, a| x.setpgid(a[0], a[1])),
        CallSpec::handled("getpgrp", BenignDefault, 0, |x, _| x.getpgrp()),
        CallSpec::handled("setsid", RequireCapability, 0, |x, _| x.setsid()),
        CallSpec::handled("getsid", RequireCapability, 1, |x, a| x.getsid(a[0])),
        // scheduling hints
        CallSpec::handled("nice", NoopWithoutCapability, 1, |x, a| x.nice(a[0])),
        CallSpec::handled("getpriority", NoopWithoutCapability, 2, |x, a| {
            x.getpriority(a[0], a[1])
        }),
        CallSpec::handled("setpriority", NoopWithoutCapability, 3, |x, a| {
            x.setpriority(a[0], a[1], a[2])
        }),
        // privilege transitions
        CallSpec::handled("seteuid", RequireCapability, 1, |x, a| x.seteuid(a[0] as u32)),
        CallSpec::handled("setegid", RequireCapability, 1, |x, a| x.setegid(a[0] as u32)),
        CallSpec::handled("setgid", RequireCapability, 1, |x, a| x.setgid(a[0] as u32)),
        CallSpec::handled("setreuid", RequireCapability, 2, |x, a| {
            x.setreuid(a[0] as u32, a[1] as u32)
        }),
        CallSpec::handled("setregid", RequireCapability, 2, |x, a| {
            x.setregid(a[0] as u32, a[1] as u32)
        }),
        CallSpec::handled("setresuid", RequireCapability, 3, |x, a| {
            x.setresuid(a[0] as u32, a[1] as u32, a[2] as u32)
        }),
        CallSpec::handled("setresgid", RequireCapability, 3, |x, a| {
            x.setresgid(a[0] as u32, a[1] as u32, a[2] as u32)
        }),
        CallSpec::handled("getresuid", StructuredTransfer, 3, |x, a| {
            x.getresuid(ptr(a[0]), ptr(a[1]), ptr(a[2]))
        }),
        CallSpec::handled("getresgid", StructuredTransfer, 3, |x, a| {
            x.getresgid(ptr(a[0]), ptr(a[1]), ptr(a[2]))
        }),
        CallSpec::handled("execve", RequireCapability, 3, |x, a| {
            x.execve(ptr(a[0]), ptr(a[1]), ptr(a[2]))
        }),
        // host identity
        CallSpec::handled("getlogin", RequireCapability, 0, |x, _| x.getlogin()),
        CallSpec::handled("gethostname", RequireCapability, 2, |x, a| {
            x.gethostname(ptr(a[0]), a[1])
        }),
        CallSpec::handled("sethostname", RequireCapability, 2, |x, a| {
            x.sethostname(ptr(a[0]), a[1])
        }),
        CallSpec::handled("ttyname_r", RequireCapability, 3, |x, a| {
            x.ttyname_r(a[0], ptr(a[1]), a[2])
        }),
        CallSpec::handled("alarm", RequireCapability, 1, |x, a| x.alarm(a[0])),
        // incompatible with the single-address-space cooperative runtime
        CallSpec::unsupported("dup", 1),
        CallSpec::unsupported("dup2", 2),
        CallSpec::unsupported("dup3", 3),
        CallSpec::unsupported("fork", 0),
        CallSpec::unsupported("fork1", 0),
        CallSpec::unsupported("forkpty", 4),
        CallSpec::unsupported("setuid", 1),
        CallSpec::unsupported("setgroups", 2),
        CallSpec::unsupported("setpgrp", 0),
        CallSpec::unsupported("tcgetpgrp", 1),
        CallSpec::unsupported("tcsetpgrp", 2),
    ]
}
