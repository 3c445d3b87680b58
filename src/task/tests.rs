#[cfg(test)]
mod tests {
    use crate::list::{TaskGrouper, filter_out_internal};
    use crate::task::*;
    use crate::taskfile::{TaskSorter, Taskfile};

    const TASKFILE: &str = "\
version: '3'

tasks:
  default: task --list
  release:
    - cargo build --release
    - task: package
    - cargo build --release
  package:
    desc: Package the release binary
    category: release
    index: 1
    cmds:
      - tar czf taskr.tgz target/release/taskr
  publish:
    desc: Publish the package
    category: release
    index: 0
    cmd: cargo publish
  docs:api:gen:
    desc: Generate API docs
    internal: true
    cmd: cargo doc
  docs:serve:
    desc: Serve docs
    aliases: [ds]
    cmd: mdbook serve
  deploy:*:*:
    desc: Deploy a service to an environment
    cmd: ./deploy.sh
";

    fn taskfile() -> Taskfile {
        Taskfile::parse(TASKFILE, "Taskfile.yml").unwrap()
    }

    #[test]
    fn test_all_shapes_decode_to_one_model() {
        let taskfile = taskfile();

        let default = taskfile.get("default").unwrap();
        assert_eq!(default.cmds, vec![Command::shell("task --list")]);

        let release = taskfile.get("release").unwrap();
        assert_eq!(release.cmds.len(), 3);
        assert!(release.cmds[1].is_task_call());
        assert_eq!(release.cmds[0], release.cmds[2]);

        let publish = taskfile.get("publish").unwrap();
        assert_eq!(publish.cmds, vec![Command::shell("cargo publish")]);
        assert_eq!(publish.index, Some(0));
        assert_eq!(publish.location.as_ref().unwrap().taskfile.to_str(), Some("Taskfile.yml"));
    }

    #[test]
    fn test_grouping_uses_index_before_line() {
        let taskfile = taskfile();
        let tasks = taskfile.task_list(&[], TaskSorter::None);

        let grouper = TaskGrouper::new("General", Vec::new());
        let grouped = grouper.group(&tasks);

        let release: Vec<&str> = grouped["release"].iter().map(|t| t.task.as_str()).collect();
        assert_eq!(release, vec!["publish", "package"]);
        assert_eq!(grouper.sorted_groups(&grouped), vec!["General", "release"]);

        // declaration order for unindexed tasks
        let general: Vec<&str> = grouped["General"].iter().map(|t| t.task.as_str()).collect();
        assert_eq!(
            general,
            vec!["default", "release", "docs:api:gen", "docs:serve", "deploy:*:*"]
        );
    }

    #[test]
    fn test_wildcard_lookup_through_taskfile() {
        let taskfile = taskfile();

        let matched = taskfile.find("deploy:api:staging").unwrap();
        assert_eq!(matched.task.task, "deploy:*:*");
        assert_eq!(matched.wildcards, vec!["api", "staging"]);

        assert!(taskfile.find("deploy:api").is_err());
        assert_eq!(taskfile.find("ds").unwrap().task.task, "docs:serve");
    }

    #[test]
    fn test_namespace_tree_from_taskfile() {
        let taskfile = taskfile();
        let tasks = taskfile.task_list(&[filter_out_internal], TaskSorter::AlphaNumeric);
        let decorated = tasks.iter().map(|task| DecoratedTask::new(task)).collect();

        let root = NamespaceNode::build(decorated, true, Some(taskfile.location.clone()));
        let root_tasks: Vec<&str> = root.tasks.iter().map(|t| t.task.task.as_str()).collect();
        assert_eq!(root_tasks, vec!["default", "package", "publish", "release"]);

        let docs = root.get(&["docs"]).unwrap();
        assert_eq!(docs.tasks.len(), 1);
        // the internal task was filtered before the tree was built
        assert!(docs.children.is_empty());

        assert!(root.get(&["deploy", "*"]).is_some());
        assert_eq!(root.task_count(), tasks.len());
    }

    #[test]
    fn test_namespaced_copy_keeps_commands() {
        let taskfile = taskfile();
        let serve = taskfile.get("docs:serve").unwrap();

        let copy = serve.namespaced("site");
        assert_eq!(copy.task, "site:docs:serve");
        assert_eq!(copy.aliases, vec!["site:ds"]);
        assert_eq!(copy.cmds, serve.cmds);
        assert_eq!(copy.location, serve.location);
    }
}
