//! Fixed report text: exploitation hints, common targets and remediation

/// Shown instead of a report when no configuration text was supplied
pub const EMPTY_INPUT: &str = "❌ Please provide Apache configuration content\n";

pub const NO_FINDINGS: &str = "
## ✅ **No known Confusion Attack patterns found**

The configuration looks relatively safe, but it is still worth:
1. Reviewing every RewriteRule carefully
2. Making sure authentication is configured correctly
3. Running security reviews regularly

";

pub const HINTS_HEADER: &str = "## 🎯 **Exploitation Hints**

### Attack Approach
";

pub const FILENAME_CONFUSION_HINTS: &str = "
#### Filename Confusion Attacks
1. **Path truncation**: use `%3F` (?) to cut off the path built by a RewriteRule
2. **Authentication bypass**: request a protected .php file as `filename.php%3Fany.php`
3. **Upload abuse**: upload a .gif file and execute it via `file.gif%3Ftest.php`
";

pub const DOCUMENTROOT_CONFUSION_HINTS: &str = "
#### DocumentRoot Confusion Attacks
1. **Arbitrary file read**: request system files such as `/etc/passwd`
2. **Source disclosure**: read CGI scripts and PHP configuration files
3. **Reconnaissance**: explore sensitive files under `/usr/share/`
";

pub const COMMON_TARGETS: &str = "
### Common Targets

#### System Files
- `/etc/passwd` - system user accounts
- `/etc/shadow` - password hashes (requires privileges)
- `/proc/self/environ` - environment variables

#### Web Application Files
- `config.php` - database configuration
- `.htpasswd` - HTTP authentication file
- `web.xml` - Java application configuration

#### CGI/Script Files
- `/usr/lib/cgi-bin/` - CGI script directory
- `/var/www/cgi-bin/` - web CGI directory

### Payload Examples
";

pub const REMEDIATION: &str = "
## ⚠️ **Remediation**

1. **Narrow RewriteRule scope**: avoid overly broad regular expressions
2. **Use Directory directives**: prefer them over Files for access control
3. **Validate input**: strictly validate what a RewriteRule captures
4. **Least privilege**: limit the files the Apache user can read
5. **Stay updated**: keep Apache patched

---
*This analysis is based on known Confusion Attack patterns; confirm it with manual testing*
";
