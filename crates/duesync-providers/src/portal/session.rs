//! Logged-in portal session.
//!
//! Login is a plain form post: the login page is fetched for its CSRF token,
//! then the credentials are posted back. The session cookie lives in the
//! client's cookie store and rides along on every later request.

use std::time::Duration;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use super::config::PortalConfig;
use super::error::{PortalError, PortalResult};

selector!(CSRF_INPUT, "input[name=authenticity_token]");
selector!(CSRF_META, "meta[name=csrf-token]");

/// The portal's response to a wrong username or password.
pub const LOGIN_FAILED_MARKER: &str = "Invalid email/password combination.";

const USER_AGENT: &str = concat!("duesync/", env!("CARGO_PKG_VERSION"));

/// An authenticated portal session.
#[derive(Debug)]
pub struct PortalSession {
    client: reqwest::Client,
    base_url: Url,
    load_timeout: Duration,
}

impl PortalSession {
    /// Logs in with the configured credentials.
    pub async fn login(config: &PortalConfig) -> PortalResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        let login_url = config.base_url.join("login")?;
        info!("logging in to {}", config.base_url);

        let login_page = get_text(&client, &login_url).await?;
        let token = csrf_token(&login_page).ok_or(PortalError::MissingCsrfToken)?;

        let form = [
            ("utf8", "✓"),
            ("authenticity_token", token.as_str()),
            ("session[email]", config.username.as_str()),
            ("session[password]", config.password.as_str()),
            ("session[remember_me]", "0"),
            ("commit", "Log In"),
        ];

        let response = client.post(login_url.clone()).form(&form).send().await?;
        let body = success_text(response).await?;

        if body.contains(LOGIN_FAILED_MARKER) {
            return Err(PortalError::LoginFailed);
        }

        info!("logged in as {}", config.username);
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            load_timeout: config.load_timeout,
        })
    }

    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// Fetches a course's page, bounded by the course load timeout.
    ///
    /// `course_name` only labels the error.
    pub async fn fetch_course_page(&self, course_id: &str, course_name: &str) -> PortalResult<String> {
        let url = self.base_url.join(&format!("courses/{}", course_id))?;
        debug!("loading course {} from {}", course_name, url);

        tokio::time::timeout(self.load_timeout, get_text(&self.client, &url))
            .await
            .map_err(|_| PortalError::CourseLoadTimeout {
                course: course_name.to_string(),
                timeout: self.load_timeout,
            })?
    }
}

async fn get_text(client: &reqwest::Client, url: &Url) -> PortalResult<String> {
    let response = client.get(url.clone()).send().await?;
    success_text(response).await
}

async fn success_text(response: reqwest::Response) -> PortalResult<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(PortalError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Reads the CSRF token from the login form, falling back to the meta tag.
fn csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&CSRF_INPUT)
        .chain(document.select(&CSRF_META))
        .find_map(|element| {
            element
                .value()
                .attr("value")
                .or_else(|| element.value().attr("content"))
                .map(String::from)
        })
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOGIN_PAGE: &str = r#"<html><body>
        <form action="/login" method="post">
          <input type="hidden" name="authenticity_token" value="tok+123==" />
          <input name="session[email]" type="email" />
          <input name="session[password]" type="password" />
          <input type="submit" name="commit" value="Log In" />
        </form></body></html>"#;

    fn config(server: &MockServer) -> PortalConfig {
        PortalConfig::new("me@uni.edu", "s3cret")
            .unwrap()
            .with_base_url(&server.uri())
            .unwrap()
            .with_course_ids(vec!["940384".into()])
            .with_load_timeout(Duration::from_millis(300))
    }

    async fn mount_login(server: &MockServer, response_body: &str) {
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains("authenticity_token=tok%2B123%3D%3D"))
            .and(body_string_contains("session%5Bemail%5D=me%40uni.edu"))
            .and(body_string_contains("session%5Bpassword%5D=s3cret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "_gradescope_session=abc; path=/")
                    .set_body_string(response_body),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn csrf_from_input_or_meta() {
        assert_eq!(csrf_token(LOGIN_PAGE).as_deref(), Some("tok+123=="));

        let meta_only = r#"<html><head><meta name="csrf-token" content="m-1"></head></html>"#;
        assert_eq!(csrf_token(meta_only).as_deref(), Some("m-1"));

        assert_eq!(csrf_token("<html></html>"), None);
    }

    #[tokio::test]
    async fn login_success_keeps_cookie() {
        let server = MockServer::start().await;
        mount_login(&server, "<html><body>Your Courses</body></html>").await;

        Mock::given(method("GET"))
            .and(path("/courses/940384"))
            .and(wiremock::matchers::header("cookie", "_gradescope_session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>course</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let session = PortalSession::login(&config(&server)).await.unwrap();
        let page = session.fetch_course_page("940384", "MAT 111").await.unwrap();
        assert!(page.contains("course"));
    }

    #[tokio::test]
    async fn login_rejected() {
        let server = MockServer::start().await;
        mount_login(
            &server,
            "<div class='alert'>Invalid email/password combination.</div>",
        )
        .await;

        let err = PortalSession::login(&config(&server)).await.unwrap_err();
        assert!(matches!(err, PortalError::LoginFailed));
    }

    #[tokio::test]
    async fn login_page_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = PortalSession::login(&config(&server)).await.unwrap_err();
        assert!(matches!(err, PortalError::MissingCsrfToken));
    }

    #[tokio::test]
    async fn slow_course_page_times_out() {
        let server = MockServer::start().await;
        mount_login(&server, "ok").await;
        Mock::given(method("GET"))
            .and(path("/courses/940384"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let session = PortalSession::login(&config(&server)).await.unwrap();
        let err = session
            .fetch_course_page("940384", "MAT 111")
            .await
            .unwrap_err();
        match err {
            PortalError::CourseLoadTimeout { course, timeout } => {
                assert_eq!(course, "MAT 111");
                assert_eq!(timeout, Duration::from_millis(300));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn course_page_error_status() {
        let server = MockServer::start().await;
        mount_login(&server, "ok").await;
        Mock::given(method("GET"))
            .and(path("/courses/1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let session = PortalSession::login(&config(&server)).await.unwrap();
        let err = session.fetch_course_page("1", "Unknown Course").await.unwrap_err();
        assert!(matches!(err, PortalError::Status { status: 404, .. }));
    }
}
