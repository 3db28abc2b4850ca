//! Built-in support table for rustysd
//!
//! Keep this in sync with the unit parser and the service startup code. An
//! entry that no longer matches any term in the scanned man pages is reported
//! as drift at the end of every run.

use super::SupportRecord;

pub(super) fn entries() -> Vec<(&'static str, SupportRecord)> {
    vec![
        // sd_notify
        ("READY=", SupportRecord::supported("")),
        ("STATUS=", SupportRecord::supported("Shown in the unit status")),
        (
            "$NOTIFY_SOCKET",
            SupportRecord::supported("Set for services with a notification socket"),
        ),
        // systemd.exec
        ("User=", SupportRecord::supported("")),
        ("Group=", SupportRecord::supported("")),
        (
            "SupplementaryGroups=",
            SupportRecord::partial("Resolved once when the service is loaded"),
        ),
        ("$LISTEN_FDS", SupportRecord::supported("")),
        ("$LISTEN_PID", SupportRecord::supported("")),
        ("$LISTEN_FDNAMES", SupportRecord::supported("")),
        // systemd.service
        (
            "Type=",
            SupportRecord::partial(
                "simple, notify, oneshot and dbus; dbus needs the dbus_support feature",
            ),
        ),
        (
            "ExecStart=",
            SupportRecord::supported("Only a single command line is accepted"),
        ),
        ("ExecStartPre=", SupportRecord::supported("")),
        ("ExecStartPost=", SupportRecord::supported("")),
        ("ExecStop=", SupportRecord::supported("")),
        ("ExecStopPost=", SupportRecord::supported("")),
        (
            "Restart=",
            SupportRecord::partial("Only no and always are recognized"),
        ),
        ("NotifyAccess=", SupportRecord::supported("")),
        ("Sockets=", SupportRecord::supported("")),
        (
            "BusName=",
            SupportRecord::partial("Requires the dbus_support feature"),
        ),
        ("TimeoutStartSec=", SupportRecord::supported("")),
        ("TimeoutStopSec=", SupportRecord::supported("")),
        ("TimeoutSec=", SupportRecord::supported("")),
        // systemd.socket
        ("ListenStream=", SupportRecord::supported("")),
        ("ListenDatagram=", SupportRecord::supported("")),
        ("ListenSequentialPacket=", SupportRecord::supported("")),
        ("ListenFIFO=", SupportRecord::supported("")),
        ("Accept=", SupportRecord::partial("Only Accept=no")),
        ("FileDescriptorName=", SupportRecord::supported("")),
        ("Service=", SupportRecord::supported("")),
        // systemd.unit
        ("Description=", SupportRecord::supported("")),
        ("Wants=", SupportRecord::supported("")),
        ("Requires=", SupportRecord::supported("")),
        (
            "After=",
            SupportRecord::supported("Ordering is only applied at startup"),
        ),
        (
            "Before=",
            SupportRecord::supported("Ordering is only applied at startup"),
        ),
        ("WantedBy=", SupportRecord::supported("")),
        ("RequiredBy=", SupportRecord::supported("")),
    ]
}
