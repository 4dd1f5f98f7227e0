//! Built-in templates. Any of them can be replaced with `TemplateEngine::register_template`
//! or by a file of the same name in the template directory.

pub const ERROR: &str = r#"<!DOCTYPE html>
<html>
<head><title>{{title}}</title></head>
<body>
{{show_breadcrumbs breadcrumbs}}
<h1>{{title}}</h1>
{{show_error_list error_list}}
</body>
</html>
"#;

pub const INDEX: &str = r#"<!DOCTYPE html>
<html>
<head><title>Home</title></head>
<body>
{{show_breadcrumbs breadcrumbs}}
<h1>Home</h1>
<ul>
{{#each webs}}<li><a href="{{list_url}}">{{verbose_name_plural}}</a></li>
{{/each}}
</ul>
</body>
</html>
"#;

pub const OBJECT_LIST: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>{{web.verbose_name_plural}}</title>
{{#each media.css}}<link rel="stylesheet" href="{{this}}">{{/each}}
{{#each media.js}}<script src="{{this}}"></script>{{/each}}
</head>
<body>
{{show_breadcrumbs breadcrumbs}}
<h1>{{web.verbose_name_plural}}</h1>
{{show_buttons tools}}
{{#if form}}
<form method="get" action="">
{{#each form.fields}}<p><label for="id_{{name}}">{{label}}</label>
<input type="{{input_type}}" name="{{name}}" id="id_{{name}}" value="{{value}}"></p>
{{/each}}
<input type="submit" value="Search">
</form>
{{/if}}
<table>
<thead><tr>{{#each table.columns}}<th>{{label}}</th>{{/each}}</tr></thead>
<tbody>
{{#each page_obj.object_list}}
<tr>{{#each cells}}<td>{{#if @first}}<a href="{{../url}}">{{#if this}}{{this}}{{else}}{{../label}}{{/if}}</a>{{else}}{{this}}{{/if}}</td>{{/each}}</tr>
{{else}}
<tr><td>No {{@root.web.verbose_name_plural}}.</td></tr>
{{/each}}
</tbody>
</table>
{{show_pagination pagination}}
</body>
</html>
"#;

pub const OBJECT_DETAIL: &str = r#"<!DOCTYPE html>
<html>
<head><title>{{object.label}}</title></head>
<body>
{{show_breadcrumbs breadcrumbs}}
<h1>{{object.label}}</h1>
{{show_buttons tools}}
<table>
{{#each fields}}<tr><th>{{label}}</th><td>{{value}}</td></tr>
{{/each}}
</table>
</body>
</html>
"#;

pub const OBJECT_EDIT: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>{{#if object}}Edit {{object.label}}{{else}}Add {{web.verbose_name}}{{/if}}</title>
{{#each media.css}}<link rel="stylesheet" href="{{this}}">{{/each}}
{{#each media.js}}<script src="{{this}}"></script>{{/each}}
</head>
<body>
{{show_breadcrumbs breadcrumbs}}
<h1>{{#if object}}Edit {{object.label}}{{else}}Add {{web.verbose_name}}{{/if}}</h1>
{{show_error_list error_list}}
<form method="post" action="">
{{#each form.fields}}
<p><label for="id_{{name}}">{{label}}</label>
{{#if textarea}}<textarea name="{{name}}" id="id_{{name}}">{{value}}</textarea>{{else}}{{#if checkbox}}<input type="checkbox" name="{{name}}" id="id_{{name}}"{{#if checked}} checked{{/if}}>{{else}}<input type="{{input_type}}" name="{{name}}" id="id_{{name}}" value="{{value}}"{{#if required}} required{{/if}}>{{/if}}{{/if}}
{{#each errors}}<span class="error">{{this}}</span>{{/each}}</p>
{{/each}}
<input type="submit" value="Save">
</form>
</body>
</html>
"#;

pub const OBJECT_CONFIRM_DELETE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Delete {{object.label}}</title></head>
<body>
{{show_breadcrumbs breadcrumbs}}
<h1>Delete {{object.label}}</h1>
{{show_error_list errorlist}}
<p>Are you sure you want to delete {{object.label}}?</p>
<form method="post" action="">
<input type="submit" value="Yes, delete">
</form>
</body>
</html>
"#;

pub const BREADCRUMBS: &str = r#"<div class="breadcrumbs">{{#each breadcrumbs}}<a href="{{url}}">{{name}}</a> &rsaquo; {{/each}}{{#if object}}{{object.name}}{{/if}}</div>"#;

pub const ERROR_LIST: &str =
    r#"{{#if error_list}}<ul class="errorlist">{{#each error_list}}<li>{{this}}</li>{{/each}}</ul>{{/if}}"#;

pub const BUTTONS: &str = r#"{{#if buttons}}<ul class="object-tools">{{#each buttons}}<li><a href="{{url}}" class="{{class}}">{{text}}</a></li>{{/each}}</ul>{{/if}}"#;

pub const PAGINATION: &str = r#"{{#if pagination_required}}<div class="pagination">
{{#if prev_url}}<a href="{{prev_url}}" class="prev">&laquo; previous</a>{{/if}}
{{#each page_range}}{{#if ellipsis}}<span class="ellipsis">&hellip;</span>{{else}}{{#if current}}<span class="current">{{page}}</span>{{else}}<a href="{{url}}">{{page}}</a>{{/if}}{{/if}}
{{/each}}
{{#if next_url}}<a href="{{next_url}}" class="next">next &raquo;</a>{{/if}}
</div>{{/if}}
<p class="paginator">{{start_index}}-{{end_index}} of {{count}}</p>"#;

/// (name, source) for every built-in template.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("webs/error.html", ERROR),
    ("webs/index.html", INDEX),
    ("webs/object_list.html", OBJECT_LIST),
    ("webs/object_detail.html", OBJECT_DETAIL),
    ("webs/object_edit.html", OBJECT_EDIT),
    ("webs/object_confirm_delete.html", OBJECT_CONFIRM_DELETE),
    ("webs_breadcrumbs", BREADCRUMBS),
    ("webs_error_list", ERROR_LIST),
    ("webs_buttons", BUTTONS),
    ("webs_pagination", PAGINATION),
];
