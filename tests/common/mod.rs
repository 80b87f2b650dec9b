#![allow(dead_code)]

pub mod project {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use typedroute::config::{Mode, RegistryConfig};

    /// A throwaway project directory with a route source tree.
    pub struct TempProject {
        dir: TempDir,
    }

    impl TempProject {
        pub fn new() -> Self {
            TempProject {
                dir: TempDir::new().unwrap(),
            }
        }

        /// A modern layout with `app/` as source root and the given route files.
        pub fn modern(files: &[&str]) -> Self {
            let project = Self::new();
            fs::create_dir_all(project.root().join("app")).unwrap();
            for file in files {
                project.write(&format!("app/{file}"), "export async function GET() {}\n");
            }
            project
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn path(&self, rel: &str) -> PathBuf {
            self.dir.path().join(rel)
        }

        pub fn write(&self, rel: &str, content: &str) {
            let path = self.path(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        pub fn read(&self, rel: &str) -> String {
            fs::read_to_string(self.path(rel)).unwrap()
        }

        pub fn config(&self, mode: Mode) -> RegistryConfig {
            RegistryConfig {
                mode,
                ..RegistryConfig::new(self.root())
            }
        }
    }
}

pub mod transport {
    use bytes::Bytes;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use http::{HeaderMap, HeaderValue, StatusCode};
    use std::sync::{Arc, Mutex};
    use typedroute::client::{ClientError, ClientRequest, RawResponse, Transport};

    /// Transport answering every request with one canned response and recording requests.
    #[derive(Clone)]
    pub struct StubTransport {
        status: StatusCode,
        content_type: Option<&'static str>,
        body: &'static str,
        pub seen: Arc<Mutex<Vec<ClientRequest>>>,
    }

    impl StubTransport {
        pub fn json(status: u16, body: &'static str) -> Self {
            StubTransport {
                status: StatusCode::from_u16(status).unwrap(),
                content_type: Some("application/json"),
                body,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn last(&self) -> ClientRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: ClientRequest) -> BoxFuture<'_, Result<RawResponse, ClientError>> {
            let url = request.url.clone();
            self.seen.lock().unwrap().push(request);
            let mut headers = HeaderMap::new();
            if let Some(ct) = self.content_type {
                headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(ct));
            }
            let response = RawResponse {
                status: self.status,
                headers,
                body: Bytes::from_static(self.body.as_bytes()),
                url,
            };
            async move { Ok(response) }.boxed()
        }
    }
}
