//! Dependency-manifest classifier: fixed per-ecosystem tables mapping known
//! packages to canonical skill names.
//!
//! Unrecognized content is silently ignored and absent manifests are skipped,
//! so classification never fails. Classifying the same content twice yields
//! the same skill set.

use std::collections::BTreeSet;

use serde_json::Value;

/// Whichever well-known manifest files exist in a repository. Missing files
/// are simply `None`, never errors.
#[derive(Debug, Default, Clone)]
pub struct DependencyFiles {
    pub package_json: Option<Value>,
    pub requirements_txt: Option<String>,
    pub pom_xml: Option<String>,
    pub gemfile: Option<String>,
    pub go_mod: Option<String>,
    pub composer_json: Option<Value>,
    pub cargo_toml: Option<String>,
}

impl DependencyFiles {
    pub fn is_empty(&self) -> bool {
        self.package_json.is_none()
            && self.requirements_txt.is_none()
            && self.pom_xml.is_none()
            && self.gemfile.is_none()
            && self.go_mod.is_none()
            && self.composer_json.is_none()
            && self.cargo_toml.is_none()
    }
}

/// npm package name -> skill. Exact key match against the dependency maps.
const NPM_PACKAGES: &[(&str, &str)] = &[
    ("react", "React"),
    ("react-dom", "React"),
    ("next", "Next.js"),
    ("vue", "Vue"),
    ("@angular/core", "Angular"),
    ("svelte", "Svelte"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("@nestjs/core", "NestJS"),
    ("tailwindcss", "Tailwind CSS"),
    ("typescript", "TypeScript"),
    ("jest", "Jest"),
    ("vitest", "Vitest"),
    ("webpack", "Webpack"),
    ("vite", "Vite"),
    ("redux", "Redux"),
    ("@reduxjs/toolkit", "Redux"),
    ("zustand", "Zustand"),
    ("prisma", "Prisma"),
    ("@prisma/client", "Prisma"),
    ("mongoose", "MongoDB"),
    ("pg", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mysql2", "MySQL"),
    ("redis", "Redis"),
    ("@supabase/supabase-js", "Supabase"),
    ("firebase", "Firebase"),
    ("axios", "Axios"),
    ("graphql", "GraphQL"),
    ("@apollo/client", "GraphQL"),
    ("socket.io", "Socket.io"),
    ("nodemon", "Node.js"),
    ("dotenv", "Node.js"),
];

/// Packages whose presence marks a Node.js backend.
const NPM_BACKEND_MARKERS: &[&str] = &["express", "fastify", "@nestjs/core", "nodemon"];

/// PyPI name fragment -> skill. Substring match per requirements.txt line.
const PYPI_FRAGMENTS: &[(&str, &str)] = &[
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("pandas", "Pandas"),
    ("numpy", "NumPy"),
    ("tensorflow", "TensorFlow"),
    ("torch", "PyTorch"),
    ("pytorch", "PyTorch"),
    ("scikit-learn", "Scikit-learn"),
    ("sklearn", "Scikit-learn"),
    ("requests", "Requests"),
    ("sqlalchemy", "SQLAlchemy"),
    ("celery", "Celery"),
    ("pytest", "Testing"),
    ("beautifulsoup", "Web Scraping"),
    ("selenium", "Selenium"),
];

/// Classifies whichever manifests are present and returns the union of the
/// skills they imply.
pub fn extract_skills_from_dependencies(files: &DependencyFiles) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    if let Some(pkg) = &files.package_json {
        classify_package_json(pkg, &mut skills);
    }
    if let Some(text) = &files.requirements_txt {
        classify_requirements_txt(text, &mut skills);
    }
    if let Some(xml) = &files.pom_xml {
        classify_pom_xml(xml, &mut skills);
    }
    if let Some(text) = &files.gemfile {
        classify_gemfile(text, &mut skills);
    }
    if let Some(text) = &files.go_mod {
        classify_go_mod(text, &mut skills);
    }
    if let Some(composer) = &files.composer_json {
        classify_composer_json(composer, &mut skills);
    }
    if let Some(text) = &files.cargo_toml {
        classify_cargo_toml(text, &mut skills);
    }

    skills
}

fn classify_package_json(pkg: &Value, skills: &mut BTreeSet<String>) {
    let mut deps: BTreeSet<&str> = BTreeSet::new();
    for section in ["dependencies", "devDependencies"] {
        if let Some(map) = pkg.get(section).and_then(Value::as_object) {
            deps.extend(map.keys().map(String::as_str));
        }
    }

    for name in &deps {
        if let Some((_, skill)) = NPM_PACKAGES.iter().find(|(pkg_name, _)| pkg_name == name) {
            skills.insert((*skill).to_string());
        }
    }

    // Backend-framework packages imply the platform runtime.
    if NPM_BACKEND_MARKERS.iter().any(|m| deps.contains(m)) {
        skills.insert("Node.js".to_string());
    }

    // Untyped unless a TypeScript marker package is present.
    if !deps.contains("typescript") {
        skills.insert("JavaScript".to_string());
    }
}

fn classify_requirements_txt(text: &str, skills: &mut BTreeSet<String>) {
    for line in text.to_lowercase().lines() {
        for (fragment, skill) in PYPI_FRAGMENTS {
            if line.contains(fragment) {
                skills.insert((*skill).to_string());
            }
        }
    }
    skills.insert("Python".to_string());
}

fn classify_pom_xml(xml: &str, skills: &mut BTreeSet<String>) {
    let lower = xml.to_lowercase();
    if lower.contains("spring") {
        skills.insert("Spring".to_string());
    }
    if lower.contains("spring-boot") {
        skills.insert("Spring Boot".to_string());
    }
    if lower.contains("hibernate") {
        skills.insert("Hibernate".to_string());
    }
    if lower.contains("junit") {
        skills.insert("Testing".to_string());
    }
    skills.insert("Java".to_string());
    skills.insert("Maven".to_string());
}

fn classify_gemfile(text: &str, skills: &mut BTreeSet<String>) {
    let lower = text.to_lowercase();
    if lower.contains("rails") {
        skills.insert("Rails".to_string());
    }
    if lower.contains("sinatra") {
        skills.insert("Sinatra".to_string());
    }
    if lower.contains("rspec") {
        skills.insert("Testing".to_string());
    }
    skills.insert("Ruby".to_string());
}

fn classify_go_mod(text: &str, skills: &mut BTreeSet<String>) {
    let lower = text.to_lowercase();
    if lower.contains("gin") {
        skills.insert("Gin".to_string());
    }
    if lower.contains("echo") {
        skills.insert("Echo".to_string());
    }
    skills.insert("Go".to_string());
}

fn classify_composer_json(composer: &Value, skills: &mut BTreeSet<String>) {
    for section in ["require", "require-dev"] {
        if let Some(map) = composer.get(section).and_then(Value::as_object) {
            for name in map.keys() {
                if name.contains("laravel") {
                    skills.insert("Laravel".to_string());
                }
                if name.contains("symfony") {
                    skills.insert("Symfony".to_string());
                }
            }
        }
    }
    skills.insert("PHP".to_string());
}

fn classify_cargo_toml(text: &str, skills: &mut BTreeSet<String>) {
    let lower = text.to_lowercase();
    if lower.contains("actix") {
        skills.insert("Actix".to_string());
    }
    if lower.contains("rocket") {
        skills.insert("Rocket".to_string());
    }
    skills.insert("Rust".to_string());
}
