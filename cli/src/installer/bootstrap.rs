//! Bootstrap riser onto an existing kubernetes cluster
//!
//! Everything is driven through `kubectl` and `git` as external processes. The
//! install runs as two step chains because the second chain needs the API key
//! read by the first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::errors::CliError;
use crate::notify::Notifier;
use crate::steps::{always_retry, ExecStep, RetryStep, Step, StepRunner};
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Context;
use crate::utils::generate_apikey;

pub const DEFAULT_ENVIRONMENT_NAME: &str = "Demo";

/// Server URL saved in the context of a bootstrapped environment
pub const BOOTSTRAP_SERVER_URL: &str = "https://riser-server.riser-system.demo.riser";

const CRD_WAIT_ATTEMPTS: u32 = 120;
const ROLLOUT_WAIT_ATTEMPTS: u32 = 180;

/// Matches a positive replica count
const AVAILABLE_REPLICAS_PATTERN: &str = "^[1-9][0-9]*$";

/// Bootstrap options
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// State repository, optionally with credentials
    pub git_url: Url,

    /// Directory holding the kubernetes manifests
    pub assets_dir: PathBuf,

    pub environment_name: String,
}

impl BootstrapOptions {
    pub fn new(git_url: Url, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_url,
            assets_dir: assets_dir.into(),
            environment_name: DEFAULT_ENVIRONMENT_NAME.to_string(),
        }
    }

    fn asset(&self, relative: &str) -> String {
        self.assets_dir.join(relative).to_string_lossy().into_owned()
    }
}

/// Install riser and save a context pointing at it
pub async fn bootstrap(
    options: &BootstrapOptions,
    layout: &StorageLayout,
    notifier: Arc<dyn Notifier>,
) -> Result<(), CliError> {
    info!("Bootstrapping environment {:?}", options.environment_name);
    let runner = StepRunner::new(notifier.clone());

    let mut check_apikey = ExecStep::shell(
        "Check for existing Riser API key",
        "kubectl get secret riser-server -n riser-system -o jsonpath='{.data.RISER_BOOTSTRAP_APIKEY}' || echo ''",
    );
    run_infrastructure_steps(&runner, options, &mut check_apikey, notifier).await?;

    let apikey = match decode_existing_apikey(check_apikey.stdout().unwrap_or_default()) {
        Some(apikey) => {
            debug!("Reusing the existing bootstrap API key");
            apikey
        }
        None => generate_apikey(),
    };

    run_riser_steps(&runner, options, layout, &apikey).await
}

async fn run_infrastructure_steps(
    runner: &StepRunner,
    options: &BootstrapOptions,
    check_apikey: &mut ExecStep,
    notifier: Arc<dyn Notifier>,
) -> Result<(), CliError> {
    let mut validate_git = ExecStep::new(
        "Validate Git remote",
        "git",
        ["ls-remote", options.git_url.as_str(), "HEAD"],
    );
    let mut prerequisites = ExecStep::new(
        "Apply prerequisites",
        "kubectl",
        [
            "apply".to_string(),
            "-f".to_string(),
            options.asset("kube-resources/istio/istio_operator.yaml"),
            "-f".to_string(),
            options.asset("kube-resources/riser-server/namespaces.yaml"),
            "-f".to_string(),
            options.asset("knative/namespace.yaml"),
            "-f".to_string(),
            options.asset("knative/serving-crds.yaml"),
            "-f".to_string(),
            options.asset("cert-manager/cert-manager.yaml"),
        ],
    );
    let mut wait_for_crds = RetryStep::new(
        || {
            Box::new(ExecStep::shell(
                "Wait for CRDs",
                "kubectl wait --for condition=established crd/clusterissuers.cert-manager.io && \
                 kubectl wait --for condition=established crd/istiooperators.install.istio.io",
            )) as Box<dyn Step>
        },
        CRD_WAIT_ATTEMPTS,
        is_crd_not_found,
    )
    .with_notifier(notifier.clone());
    let mut apply_istio = ExecStep::new(
        "Apply istio resources",
        "kubectl",
        ["apply".to_string(), "-f".to_string(), options.asset("kube-resources/istio")],
    );
    let mut wait_for_istio = RetryStep::new(
        || {
            Box::new(ExecStep::shell(
                "Wait for istio",
                &available_replicas_cmd("istiod", "istio-system"),
            )) as Box<dyn Step>
        },
        ROLLOUT_WAIT_ATTEMPTS,
        always_retry,
    )
    .with_notifier(notifier.clone());
    let mut apply_knative = ExecStep::new(
        "Apply knative resources",
        "kubectl",
        [
            "apply".to_string(),
            "-R".to_string(),
            "-f".to_string(),
            options.asset("knative"),
        ],
    );
    let mut wait_for_knative = RetryStep::new(
        || {
            Box::new(ExecStep::shell(
                "Wait for knative",
                &format!(
                    "{} && {}",
                    available_replicas_cmd("controller", "knative-serving"),
                    available_replicas_cmd("activator", "knative-serving")
                ),
            )) as Box<dyn Step>
        },
        ROLLOUT_WAIT_ATTEMPTS,
        always_retry,
    )
    .with_notifier(notifier);

    runner
        .run(&mut [
            &mut validate_git,
            &mut prerequisites,
            &mut wait_for_crds,
            check_apikey,
            &mut apply_istio,
            &mut wait_for_istio,
            &mut apply_knative,
            &mut wait_for_knative,
        ])
        .await
}

async fn run_riser_steps(
    runner: &StepRunner,
    options: &BootstrapOptions,
    layout: &StorageLayout,
    apikey: &str,
) -> Result<(), CliError> {
    let git_url = options.git_url.as_str();
    let git_username = options.git_url.username();
    let git_password = options.git_url.password().unwrap_or_default();
    let git_url_no_auth = strip_credentials(&options.git_url);

    let mut configmap = ExecStep::shell(
        "Create riser-server configmap",
        &format!(
            "kubectl create configmap riser-server --namespace=riser-system \
             --from-literal=RISER_GIT_URL={} \
             --dry-run=client -o yaml | kubectl apply -f -",
            git_url_no_auth
        ),
    );
    let mut server_secret = ExecStep::shell(
        "Create secret for riser-server",
        &format!(
            "kubectl create secret generic riser-server --namespace=riser-system \
             --from-literal=RISER_BOOTSTRAP_APIKEY={} \
             --from-literal=RISER_GIT_USERNAME={} \
             --from-literal=RISER_GIT_PASSWORD={} \
             --from-literal=RISER_POSTGRES_USERNAME=riseradmin \
             --from-literal=RISER_POSTGRES_PASSWORD=riserpw \
             --dry-run=client -o yaml | kubectl apply -f -",
            apikey, git_username, git_password
        ),
    );
    let mut controller_secret = ExecStep::shell(
        "Create secret for riser-controller",
        &format!(
            "kubectl create secret generic riser-controller --namespace=riser-system \
             --from-literal=RISER_SERVER_APIKEY={} \
             --dry-run=client -o yaml | kubectl apply -f -",
            apikey
        ),
    );
    let mut install_flux = ExecStep::shell(
        "Install flux",
        &format!("kubectl apply -f {} --namespace flux", options.asset("flux")),
    );
    let mut flux_secret = ExecStep::shell(
        "Create secret for flux",
        &format!(
            "kubectl create secret generic flux-git --namespace=flux \
             --from-literal=GIT_URL={} \
             --from-literal=GIT_PATH=state/{} \
             --dry-run=client -o yaml | kubectl apply -f -",
            git_url, options.environment_name
        ),
    );
    let mut other_resources = ExecStep::new(
        "Apply other resources",
        "kubectl",
        [
            "apply".to_string(),
            "-R".to_string(),
            "-f".to_string(),
            options.asset("kube-resources"),
        ],
    );
    let mut save_context = SaveContextStep::new(
        layout.clone(),
        Context {
            name: options.environment_name.clone(),
            server_url: BOOTSTRAP_SERVER_URL.to_string(),
            apikey: SecretString::from(apikey.to_string()),
            secure: false,
        },
    );

    runner
        .run(&mut [
            &mut configmap,
            &mut server_secret,
            &mut controller_secret,
            &mut install_flux,
            &mut flux_secret,
            &mut other_resources,
            &mut save_context,
        ])
        .await
}

/// Shell command that fails until the deployment has at least one available replica
fn available_replicas_cmd(deployment: &str, namespace: &str) -> String {
    format!(
        "kubectl get deployment {} -n {} -o jsonpath='{{.status.availableReplicas}}' | grep '{}'",
        deployment, namespace, AVAILABLE_REPLICAS_PATTERN
    )
}

fn is_crd_not_found(err: &CliError) -> bool {
    err.to_string().contains("Error from server (NotFound)")
}

/// Decode the base64 API key printed by `kubectl get secret`. Empty or
/// undecodable output means there is no usable key.
pub fn decode_existing_apikey(stdout: &str) -> Option<String> {
    let encoded = stdout.trim();
    if encoded.is_empty() {
        return None;
    }

    let decoded = BASE64.decode(encoded).ok()?;
    String::from_utf8(decoded).ok().filter(|key| !key.is_empty())
}

/// The repository URL without user info; riser-server receives credentials separately
pub fn strip_credentials(git_url: &Url) -> String {
    let mut url = git_url.clone();
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.to_string()
}

/// Saves a context for the bootstrapped environment and makes it current
struct SaveContextStep {
    name: String,
    layout: StorageLayout,
    context: Option<Context>,
}

impl SaveContextStep {
    fn new(layout: StorageLayout, context: Context) -> Self {
        Self {
            name: format!("Save riser context {:?}", context.name),
            layout,
            context: Some(context),
        }
    }
}

#[async_trait]
impl Step for SaveContextStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exec(&mut self) -> Result<(), CliError> {
        let context = self
            .context
            .take()
            .ok_or_else(|| CliError::Internal("context already saved".to_string()))?;

        let mut settings = self.layout.load_settings().await?;
        settings.save_context(context);
        self.layout.save_settings(&settings).await
    }

    fn state(&self, _key: &str) -> Option<&Value> {
        None
    }
}

/// Check that the assets directory has the layout the install expects
pub fn validate_assets_dir(assets_dir: &Path) -> Result<(), CliError> {
    for required in ["kube-resources", "knative", "cert-manager", "flux"] {
        if !assets_dir.join(required).is_dir() {
            return Err(CliError::ValidationError(format!(
                "The assets directory {:?} is missing {:?}",
                assets_dir.display().to_string(),
                required
            )));
        }
    }
    Ok(())
}
