//! Test fixtures and constants.

/// Two-level hierarchy with host and group variables.
pub const WEB_DOCUMENT: &str = r#"
webservers:
  hosts:
    web01:
      ansible_host: 10.0.0.5
      ansible_user: deploy
    web02:
      ansible_host: 10.0.0.6
      ansible_user: deploy
  vars:
    http_port: 80
  children:
    canary:
      hosts:
        web03:
          ansible_host: 10.0.0.7
          ansible_user: deploy
      vars:
        release: next
"#;

/// Single host with one address.
pub const SINGLE_HOST_DOCUMENT: &str = r#"
webservers:
  hosts:
    h2:
      ansible_host: "10.0.0.5"
"#;

/// Group document carrying a sensitive value.
pub const SECRET_DOCUMENT: &str = r#"
db:
  hosts:
    db01:
      ansible_host: 10.0.1.1
      ansible_password: hunter2
"#;

/// Multi-host document for `import hosts`.
pub const HOSTS_DOCUMENT: &str = r#"
app01:
  ansible_host: 10.0.2.1
  roles: [web, api]
app02:
  ansible_host: 10.0.2.2
"#;
