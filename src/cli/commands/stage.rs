//! cli::commands::stage
//!
//! Stage files for the next commit.
//!
//! # Design
//!
//! Without paths or `--all` the modified and untracked files are offered
//! through a multi-select prompt. Only the selected paths are staged;
//! everything else stays where it was. An empty selection stages nothing.

use anyhow::{bail, Context as _, Result};

use super::block_on;
use crate::cli::Context;
use crate::dispatch::ops;
use crate::git::Vcs;
use crate::ui::output;
use crate::ui::prompts;
use crate::ui::selection::SelectionSet;

/// Run the stage command.
pub fn stage(ctx: &Context, paths: &[String], all: bool) -> Result<()> {
    let repo = ctx.handle();
    let pick = |candidates: &[&str]| {
        prompts::select_many("Select files to stage:", candidates, ctx.interactive)
            .map_err(anyhow::Error::from)
    };
    block_on(stage_async(ctx, &repo, paths, all, pick))?
}

async fn stage_async<F>(
    ctx: &Context,
    repo: &dyn Vcs,
    paths: &[String],
    all: bool,
    pick: F,
) -> Result<()>
where
    F: FnOnce(&[&str]) -> Result<SelectionSet>,
{
    let files = if all {
        vec!["*".to_string()]
    } else if !paths.is_empty() {
        paths.to_vec()
    } else {
        let status = ops::status(repo)
            .await
            .context("Failed to read repository status")?;
        let candidates: Vec<&str> = status.stageable().collect();
        if candidates.is_empty() {
            output::print("Nothing to stage", ctx.verbosity);
            return Ok(());
        }
        if !ctx.interactive {
            bail!("No files selected; pass paths or --all");
        }
        let mut selection = pick(&candidates)?;
        selection.retain_available(candidates.iter().copied());
        if selection.is_empty() {
            output::print("Nothing selected", ctx.verbosity);
            return Ok(());
        }
        selection.take()
    };

    let ack = ops::stage(repo, Some(files.as_slice())).await?;
    output::success(ack.message, ctx.verbosity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::git::mock::{MockOperation, MockVcs};
    use crate::ui::output::Verbosity;

    fn no_prompt(_: &[&str]) -> Result<SelectionSet> {
        panic!("prompt must not be shown")
    }

    fn ctx(interactive: bool) -> Context {
        Context {
            repo: "/mock/repo".into(),
            verbosity: Verbosity::Quiet,
            interactive,
            assume_yes: false,
            config: Config::default(),
        }
    }

    #[tokio::test]
    async fn explicit_paths_are_staged() {
        let vcs = MockVcs::new().with_untracked(["a.txt", "b.txt"]);
        stage_async(&ctx(false), &vcs, &["a.txt".into()], false, no_prompt)
            .await
            .unwrap();
        let status = vcs.status().await.unwrap();
        assert_eq!(status.staged, ["a.txt"]);
        assert_eq!(status.not_added, ["b.txt"]);
    }

    #[tokio::test]
    async fn all_uses_wildcard() {
        let vcs = MockVcs::new().with_modified(["m.txt"]);
        stage_async(&ctx(false), &vcs, &[], true, no_prompt).await.unwrap();
        assert!(vcs
            .operations()
            .contains(&MockOperation::Add {
                paths: vec!["*".to_string()]
            }));
    }

    #[tokio::test]
    async fn no_selection_without_prompt_fails() {
        let vcs = MockVcs::new().with_modified(["m.txt"]);
        let err = stage_async(&ctx(false), &vcs, &[], false, no_prompt)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No files selected"));
        assert!(vcs.mutations().is_empty());
    }

    #[tokio::test]
    async fn clean_tree_has_nothing_to_stage() {
        let vcs = MockVcs::new();
        stage_async(&ctx(false), &vcs, &[], false, no_prompt)
            .await
            .unwrap();
        assert!(vcs.mutations().is_empty());
    }

    #[tokio::test]
    async fn empty_selection_stages_nothing() {
        let vcs = MockVcs::new().with_modified(["m.txt"]).with_untracked(["u.txt"]);
        stage_async(&ctx(true), &vcs, &[], false, |_| Ok(SelectionSet::new()))
            .await
            .unwrap();
        assert!(vcs.mutations().is_empty());
        assert_eq!(vcs.status().await.unwrap().modified, ["m.txt"]);
    }

    #[tokio::test]
    async fn picked_paths_are_staged() {
        let vcs = MockVcs::new().with_modified(["m.txt"]).with_untracked(["u.txt"]);
        let pick = |candidates: &[&str]| {
            let mut selection = SelectionSet::new();
            selection.toggle(candidates[1]);
            Ok(selection)
        };
        stage_async(&ctx(true), &vcs, &[], false, pick).await.unwrap();
        let status = vcs.status().await.unwrap();
        assert_eq!(status.staged, ["u.txt"]);
        assert_eq!(status.modified, ["m.txt"]);
    }
}
