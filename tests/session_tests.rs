use std::env;
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use taskhub::api;
use taskhub::models::{NewTask, Task, UserProfile};
use taskhub::session::Session;
use taskhub::storage;
use taskhub::toast::ToastType;

// Use a mutex to ensure tests run serially since they modify environment variables
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_session_env<F>(test_name: &str, base_url: &str, api_key: Option<&str>, f: F)
where
    F: FnOnce(),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut key_path = env::temp_dir();
    key_path.push(format!("taskhub_test_{}_key", test_name));
    if key_path.exists() {
        fs::remove_file(&key_path).unwrap();
    }
    env::set_var("TASKHUB_KEY_FILE", key_path.to_str().unwrap());
    env::set_var("TASKHUB_URL", base_url);
    if let Some(key) = api_key {
        storage::save_api_key(key).unwrap();
    }

    f();

    if key_path.exists() {
        let _ = fs::remove_file(&key_path);
    }
    env::remove_var("TASKHUB_KEY_FILE");
    env::remove_var("TASKHUB_URL");
}

struct Canned {
    status: u16,
    body: &'static str,
}

/// Serves the scripted responses one connection at a time and hands back
/// the request lines it saw, in order.
fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut request_lines = Vec::new();
        for canned in responses {
            let (mut stream, _addr) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let request = read_request(&mut stream);
            request_lines.push(request.lines().next().unwrap_or_default().to_string());
            respond(&mut stream, canned.status, canned.body);
        }
        request_lines
    });
    (base_url, handle)
}

fn read_request(stream: &mut TcpStream) -> String {
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if let Some(header_end) = find_header_end(&buf) {
                    let header = String::from_utf8_lossy(&buf[..header_end]).to_string();
                    if buf.len() >= header_end + 4 + content_length(&header) {
                        break;
                    }
                }
            }
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(header: &str) -> usize {
    header
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn respond(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn sample_new_task() -> NewTask {
    NewTask {
        description: "Water the plants".into(),
        notes: String::new(),
        deadline: 0,
        recurring_interval: None,
        assigned_group: None,
        assigned_user: 7,
    }
}

#[test]
fn test_no_credential_performs_no_network_calls() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    with_session_env("silent", &base_url, None, || {
        let mut session = Session::new();
        assert!(session.refresh_tasks().is_ok());
        assert!(!session.authorize().unwrap());
        assert!(session.complete_task(1).is_none());
        assert!(session.delete_task(1).is_none());
        assert!(session.create_task(&sample_new_task()).is_none());
        assert!(session.tasks.is_empty());

        listener.set_nonblocking(true).unwrap();
        match listener.accept() {
            Err(err) => assert_eq!(err.kind(), ErrorKind::WouldBlock),
            Ok(_) => panic!("a request was issued without a credential"),
        }
    });
}

#[test]
fn test_complete_task_refreshes_before_reporting() {
    let (base_url, handle) = serve(vec![
        Canned { status: 200, body: r#"{"message":"Task completed"}"# },
        Canned {
            status: 200,
            body: r#"[{"id":1,"description":"Water the plants","notes":"","completed":true,"deadline":0,"recurringInterval":null,"assignedGroup":null,"assignedUser":7}]"#,
        },
    ]);

    with_session_env("complete", &base_url, Some("key-123"), || {
        let mut session = Session::new();
        let (kind, message) = session.complete_task(1).unwrap();
        assert_eq!(kind, ToastType::Info);
        assert_eq!(message, "Task completed");
        // The refreshed snapshot already reflects the mutation.
        assert_eq!(session.tasks.len(), 1);
        assert!(session.tasks[0].completed);
    });

    let lines = handle.join().unwrap();
    assert_eq!(lines, vec![
        "POST /tasks/complete/1 HTTP/1.1".to_string(),
        "GET /tasks HTTP/1.1".to_string(),
    ]);
}

#[test]
fn test_two_deletes_leave_neither_id() {
    let (base_url, handle) = serve(vec![
        Canned { status: 200, body: r#"{"message":"Task deleted"}"# },
        Canned {
            status: 200,
            body: r#"[{"id":2,"description":"Sweep","assignedUser":7},{"id":3,"description":"Mop","assignedUser":7}]"#,
        },
        Canned { status: 200, body: r#"{"message":"Task deleted"}"# },
        Canned {
            status: 200,
            body: r#"[{"id":3,"description":"Mop","assignedUser":7}]"#,
        },
    ]);

    with_session_env("two_deletes", &base_url, Some("key-123"), || {
        let mut session = Session::new();
        let (kind, _) = session.delete_task(1).unwrap();
        assert_eq!(kind, ToastType::Info);
        let (kind, _) = session.delete_task(2).unwrap();
        assert_eq!(kind, ToastType::Info);

        let ids: Vec<u64> = session.tasks.iter().map(|t| t.id).collect();
        assert!(!ids.contains(&1));
        assert!(!ids.contains(&2));
        assert_eq!(ids, vec![3]);
    });

    let lines = handle.join().unwrap();
    assert_eq!(lines[0], "POST /tasks/delete/1 HTTP/1.1");
    assert_eq!(lines[1], "GET /tasks HTTP/1.1");
    assert_eq!(lines[2], "POST /tasks/delete/2 HTTP/1.1");
    assert_eq!(lines[3], "GET /tasks HTTP/1.1");
}

#[test]
fn test_server_rejection_is_reported_verbatim() {
    let (base_url, handle) = serve(vec![Canned {
        status: 403,
        body: r#"{"message":"Task 9 is assigned to someone else"}"#,
    }]);

    with_session_env("rejected", &base_url, Some("key-123"), || {
        let mut session = Session::new();
        let (kind, message) = session.complete_task(9).unwrap();
        assert_eq!(kind, ToastType::Error);
        assert_eq!(message, "Task 9 is assigned to someone else");
        assert!(session.tasks.is_empty());
    });

    // A rejected mutation must not trigger a refresh.
    let lines = handle.join().unwrap();
    assert_eq!(lines, vec!["POST /tasks/complete/9 HTTP/1.1".to_string()]);
}

#[test]
fn test_malformed_success_body_takes_the_transport_path() {
    let (base_url, handle) = serve(vec![Canned { status: 200, body: "pong" }]);

    with_session_env("transport", &base_url, Some("key-123"), || {
        let mut session = Session::new();
        let (kind, message) = session.complete_task(1).unwrap();
        assert_eq!(kind, ToastType::Error);
        // The specific cause is never shown to the user.
        assert_eq!(message, api::TRANSPORT_MESSAGE);
    });

    let lines = handle.join().unwrap();
    assert_eq!(lines.len(), 1);
}

#[test]
fn test_login_exchanges_credentials_for_a_key() {
    let (base_url, handle) = serve(vec![Canned { status: 200, body: r#"{"apiKey":"abc-123"}"# }]);

    with_session_env("login", &base_url, None, || {
        let session = Session::new();
        let key = api::login(&session.client, &session.base_url, "mara", "hunter2").unwrap();
        assert_eq!(key, "abc-123");
        storage::save_api_key(&key).unwrap();
        assert_eq!(storage::load_api_key(), Some("abc-123".to_string()));
    });

    let lines = handle.join().unwrap();
    assert_eq!(lines, vec!["POST /login HTTP/1.1".to_string()]);
}

#[test]
fn test_login_rejection_carries_the_server_message() {
    let (base_url, handle) = serve(vec![Canned {
        status: 401,
        body: r#"{"message":"Invalid username or password"}"#,
    }]);

    with_session_env("login_rejected", &base_url, None, || {
        let session = Session::new();
        let err = api::login(&session.client, &session.base_url, "mara", "wrong").unwrap_err();
        assert_eq!(err.message(), "Invalid username or password");
        assert_eq!(storage::load_api_key(), None);
    });

    handle.join().unwrap();
}

#[test]
fn test_sign_out_clears_key_and_caches() {
    with_session_env("sign_out", "http://127.0.0.1:1", Some("key-123"), || {
        let mut session = Session::new();
        session.profile = Some(UserProfile {
            id: 7,
            username: "mara".into(),
            name: "Mara".into(),
            groups: vec![],
        });
        session.tasks = vec![Task {
            id: 1,
            description: "Water the plants".into(),
            notes: String::new(),
            completed: false,
            deadline: 0,
            recurring_interval: None,
            assigned_group: None,
            assigned_user: 7,
        }];

        session.sign_out().unwrap();
        assert!(session.profile.is_none());
        assert!(session.tasks.is_empty());
        assert!(session.users.is_empty());
        assert!(session.groups.is_empty());
        assert_eq!(storage::load_api_key(), None);
        assert!(!session.is_authenticated());
    });
}
