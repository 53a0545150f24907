use super::check;
use crate::assertions::subject_matches;
use crate::context::SuiteContext;
use crate::error::{Error, Result};
use crate::runtime::ContainerRuntime;
use command_executor::shell_quote;
use interop_config::SuiteConfig;
use tracing::info;

pub(super) async fn commit_and_push<R>(
    runtime: &R,
    config: &SuiteConfig,
    ctx: SuiteContext,
) -> Result<SuiteContext>
where
    R: ContainerRuntime + ?Sized,
{
    let git = &config.git;
    let client = ctx.client.name.as_str();
    let server = ctx.server.name.as_str();
    let work_dir = shell_quote(&git.work_dir);
    let file = shell_quote(&git.test_file);
    let branch = shell_quote(&git.branch);

    check(
        runtime,
        client,
        None,
        &format!(
            "git config --global user.name {} && git config --global user.email {}",
            shell_quote(&git.author_name),
            shell_quote(&git.author_email)
        ),
        "could not configure commit identity",
    )
    .await?;

    check(
        runtime,
        client,
        None,
        &format!(
            "cd {work_dir} && printf '%s\\n' {} > {file} && git add {file} && git commit -m {}",
            shell_quote(&git.test_content),
            shell_quote(&git.commit_message)
        ),
        "git commit failed",
    )
    .await?;

    check(
        runtime,
        client,
        None,
        &format!("cd {work_dir} && git branch -M {branch} && git push origin {branch}"),
        &format!("git push origin {} failed", git.branch),
    )
    .await?;

    let local = check(
        runtime,
        client,
        None,
        &format!("git -C {work_dir} log -1 --format=%s"),
        "git log failed on the client",
    )
    .await?;
    if !subject_matches(&local.stdout, &git.commit_message) {
        return Err(Error::assertion(
            format!("client's latest commit is not '{}'", git.commit_message),
            local.output(),
        ));
    }

    // Read the bare repository as its owner
    let remote = check(
        runtime,
        server,
        Some(git.user.as_str()),
        &format!(
            "git --git-dir={} log -1 --format=%s {branch}",
            shell_quote(&config.server_repo_path())
        ),
        &format!("git log failed on the server's {} branch", git.branch),
    )
    .await?;
    if !subject_matches(&remote.stdout, &git.commit_message) {
        return Err(Error::assertion(
            format!(
                "remote {} does not have '{}' as its latest commit",
                git.branch, git.commit_message
            ),
            remote.output(),
        ));
    }
    info!(branch = %git.branch, subject = %git.commit_message, "commit pushed");

    Ok(ctx)
}
